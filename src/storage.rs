use crate::models::NormalizedRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save records as CSV with header `year,value,unit`.
pub fn save_csv<P: AsRef<Path>>(records: &[NormalizedRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("year", "value", "unit"))?;
    for r in records {
        wtr.serialize((r.year.to_string(), r.value, &r.unit))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as the same `{"data": [...]}` document the proxy serves.
pub fn save_json<P: AsRef<Path>>(records: &[NormalizedRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(&serde_json::json!({ "data": records }))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rec(year: &str, value: f64, unit: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            year: year.into(),
            value,
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![rec("2000", 1.25, Some("PS")), rec("2001", 2.5, None)];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();

        let csv_text = std::fs::read_to_string(&csvp).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines, ["year,value,unit", "2000,1.25,PS", "2001,2.5,"]);

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(doc["data"][0]["unit"], "PS");
        assert!(doc["data"][1].get("unit").is_none());
    }
}
