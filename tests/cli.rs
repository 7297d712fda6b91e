use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Loopback stand-in for Data360 serving a fixed three-year series.
async fn fake_upstream() -> std::net::SocketAddr {
    use axum::routing::get;
    let app = axum::Router::new().route(
        "/data",
        get(|| async {
            axum::Json(serde_json::json!({"data": [
                {"TIME_PERIOD": "2002", "OBS_VALUE": "14"},
                {"TIME_PERIOD": "2000", "OBS_VALUE": "10"},
                {"TIME_PERIOD": "2001", "OBS_VALUE": "12"}
            ]}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("asean").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("asean"));
}

#[test]
fn lists_indicators_and_countries() {
    Command::cargo_bin("asean")
        .unwrap()
        .arg("indicators")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("gdp-per-capita")
                .and(predicate::str::contains("IMF_FAS_FCMIBT")),
        );

    Command::cargo_bin("asean")
        .unwrap()
        .arg("countries")
        .assert()
        .success()
        .stdout(predicate::str::contains("MYS  Malaysia"));
}

#[test]
fn unknown_indicator_is_rejected() {
    Command::cargo_bin("asean")
        .unwrap()
        .args(["get", "unemployment"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown indicator `unemployment`"));
}

#[test]
fn unreachable_upstream_reports_request_failure() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    Command::cargo_bin("asean")
        .unwrap()
        .args(["get", "cpi", "--upstream-url", format!("http://{closed}/data").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API request failed: "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn chart_output_carries_color_and_trend_overlay() {
    let up = fake_upstream().await;
    let url = format!("http://{up}/data");
    let out = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("asean")
            .unwrap()
            .args(["get", "cpi", "--country", "tha", "--trend", "--chart"])
            .args(["--color", "rgb(16, 185, 129)", "--upstream-url", url.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let chart: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(chart["label"], "Consumer price index (2010 = 100) (Thailand)");
    assert_eq!(chart["color"], "rgb(16, 185, 129)");
    assert_eq!(chart["data"][0]["x"], "2000");
    assert_eq!(chart["regressionLine"]["color"], "rgba(59,130,246,0.5)");
    assert_eq!(chart["regressionLine"]["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn table_output_reports_trend_slope() {
    let up = fake_upstream().await;
    let url = format!("http://{up}/data");
    let out = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("asean")
            .unwrap()
            .args(["get", "inflation", "--trend", "--upstream-url", url.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success());
    assert!(stdout.starts_with("2000\t"), "{stdout}");
    assert!(stdout.contains("trend: 2.00 per year"), "{stdout}");
}

#[test]
fn color_requires_chart() {
    Command::cargo_bin("asean")
        .unwrap()
        .args(["get", "cpi", "--color", "rgb(1, 2, 3)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--chart"));
}

#[test]
fn proxy_shows_help() {
    Command::cargo_bin("asean-proxy")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--upstream-url"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_gdp() {
    Command::cargo_bin("asean")
        .unwrap()
        .args([
            "get",
            "gdp-per-capita",
            "--country",
            "MYS",
            "--from",
            "2015",
            "--to",
            "2020",
            "--stats",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("count="));
}
