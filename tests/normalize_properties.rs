use asean_indicators::models::Year;
use asean_indicators::normalize::{NormalizeError, normalize, rewrap};
use serde_json::{Value, json};

fn years(records: &[asean_indicators::NormalizedRecord]) -> Vec<i64> {
    records.iter().map(|r| r.year.as_int().unwrap()).collect()
}

#[test]
fn all_numeric_payload_keeps_every_row_in_year_order() {
    let payload = json!({
        "data": [
            {"TIME_PERIOD": "2003", "OBS_VALUE": "4.1"},
            {"TIME_PERIOD": "2001", "OBS_VALUE": 2.0},
            {"TIME_PERIOD": "2004", "OBS_VALUE": "-0.5"},
            {"TIME_PERIOD": "2002", "OBS_VALUE": 3},
        ]
    });
    let out = normalize(&payload, false).unwrap();
    assert_eq!(out.len(), 4);
    assert_eq!(years(&out), [2001, 2002, 2003, 2004]);
    assert_eq!(out[3].value, -0.5);
}

#[test]
fn null_observation_is_dropped_and_others_untouched() {
    let payload = json!({
        "data": [
            {"TIME_PERIOD": "2001", "OBS_VALUE": "5.5"},
            {"TIME_PERIOD": "1999", "OBS_VALUE": null},
            {"TIME_PERIOD": "2000", "OBS_VALUE": "3.2"},
        ]
    });
    let out = normalize(&payload, false).unwrap();
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!([{"year": "2000", "value": 3.2}, {"year": "2001", "value": 5.5}])
    );
}

#[test]
fn absent_blank_and_non_numeric_values_are_dropped() {
    let payload = json!([
        {"TIME_PERIOD": "2000"},
        {"TIME_PERIOD": "2001", "OBS_VALUE": ""},
        {"TIME_PERIOD": "2002", "OBS_VALUE": "n.a."},
        {"TIME_PERIOD": "2003", "OBS_VALUE": {"v": 1}},
        {"TIME_PERIOD": "2004", "OBS_VALUE": "7"},
        17,
    ]);
    let out = normalize(&payload, false).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].year, Year::from("2004"));
    assert_eq!(out[0].value, 7.0);
}

#[test]
fn normalizing_twice_is_stable() {
    let payload = json!({
        "value": [
            {"TIME_PERIOD": "2012", "OBS_VALUE": "10.5", "UNIT_MEASURE": "PER_1000_ADULTS"},
            {"TIME_PERIOD": "2010", "OBS_VALUE": 8.25, "UNIT_MEASURE": "PER_1000_ADULTS"},
            {"TIME_PERIOD": "2011", "OBS_VALUE": null, "UNIT_MEASURE": "PER_1000_ADULTS"},
        ]
    });
    let once = normalize(&payload, true).unwrap();
    let twice = normalize(&rewrap(&once), true).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn envelope_shapes_are_probed_in_order() {
    let row = json!({"TIME_PERIOD": "2020", "OBS_VALUE": 1.0});

    let data = json!({"data": [row.clone()]});
    let value = json!({"value": [row.clone()]});
    let top = json!([row.clone()]);
    let other = json!({"rows": [row.clone()]});

    assert_eq!(normalize(&data, false).unwrap().len(), 1);
    assert_eq!(normalize(&value, false).unwrap().len(), 1);
    assert_eq!(normalize(&top, false).unwrap().len(), 1);
    assert!(normalize(&other, false).unwrap().is_empty());
    assert!(normalize(&Value::Null, false).unwrap().is_empty());
    assert!(normalize(&json!("text"), false).unwrap().is_empty());
}

#[test]
fn loose_value_branch_fails_when_not_an_array() {
    let payload = json!({"value": {"TIME_PERIOD": "2020", "OBS_VALUE": 1.0}});
    assert_eq!(
        normalize(&payload, false),
        Err(NormalizeError::NotAnArray { found: "an object" })
    );
    // An array under `data` wins before the loose branch is consulted.
    let payload = json!({"data": [], "value": "junk"});
    assert_eq!(normalize(&payload, false), Ok(vec![]));
}

#[test]
fn unit_is_kept_only_when_tracked() {
    let payload = json!({"data": [
        {"TIME_PERIOD": "2015", "OBS_VALUE": "12", "UNIT_MEASURE": "PS"},
        {"TIME_PERIOD": "2016", "OBS_VALUE": "13"},
    ]});
    let tracked = normalize(&payload, true).unwrap();
    assert_eq!(tracked[0].unit.as_deref(), Some("PS"));
    assert_eq!(tracked[1].unit, None);

    let untracked = normalize(&payload, false).unwrap();
    assert!(untracked.iter().all(|r| r.unit.is_none()));
    assert_eq!(
        serde_json::to_value(&untracked[0]).unwrap(),
        json!({"year": "2015", "value": 12.0})
    );
}

#[test]
fn mixed_year_encodings_sort_numerically() {
    let payload = json!({"data": [
        {"TIME_PERIOD": "2010", "OBS_VALUE": 1.0},
        {"TIME_PERIOD": 999, "OBS_VALUE": 2.0},
        {"TIME_PERIOD": "unknown", "OBS_VALUE": 3.0},
        {"TIME_PERIOD": "1995", "OBS_VALUE": 4.0},
    ]});
    let out = normalize(&payload, false).unwrap();
    let values: Vec<f64> = out.iter().map(|r| r.value).collect();
    assert_eq!(values, [2.0, 4.0, 1.0, 3.0]);
    assert_eq!(serde_json::to_value(&out[0].year).unwrap(), json!(999));
}

#[test]
fn duplicate_years_keep_upstream_order() {
    let payload = json!({"data": [
        {"TIME_PERIOD": "2001", "OBS_VALUE": 1.0},
        {"TIME_PERIOD": "2000", "OBS_VALUE": 2.0},
        {"TIME_PERIOD": "2001", "OBS_VALUE": 3.0},
    ]});
    let values: Vec<f64> = normalize(&payload, false)
        .unwrap()
        .iter()
        .map(|r| r.value)
        .collect();
    assert_eq!(values, [2.0, 1.0, 3.0]);
}

#[test]
fn input_payload_is_not_modified() {
    let payload = json!({"data": [
        {"TIME_PERIOD": "2001", "OBS_VALUE": "5.5"},
        {"TIME_PERIOD": "2000", "OBS_VALUE": null},
    ]});
    let before = payload.clone();
    let _ = normalize(&payload, true).unwrap();
    assert_eq!(payload, before);
}
