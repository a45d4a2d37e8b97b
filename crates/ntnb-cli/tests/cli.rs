//! End-to-end tests for the `ntnb` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn ntnb() -> Command {
    let mut cmd = Command::cargo_bin("ntnb").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("NTNB_CONFIG");
    cmd
}

const PRICE_ARGS: [&str; 11] = [
    "price",
    "--settlement",
    "2025-11-25",
    "--maturity",
    "2055-05-15",
    "--yield",
    "6.0",
    "--vna",
    "4000",
    "--inflation",
    "0.5",
];

#[test]
fn price_table() {
    ntnb()
        .args(PRICE_ARGS)
        .arg("--flows")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quotation"))
        .stdout(predicate::str::contains("Unit Price (PU)"))
        .stdout(predicate::str::contains("May/Nov"))
        .stdout(predicate::str::contains("2055-05-17"));
}

#[test]
fn price_json() {
    let output = ntnb()
        .args(["--format", "json"])
        .args(PRICE_ARGS)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let flows = json["cash_flows"].as_array().unwrap();
    let last = flows.last().unwrap();
    assert_eq!(last["kind"], "Principal");
    assert_eq!(last["date"], "2055-05-17");
    assert!(json["duration"].as_f64().unwrap() < 29.5);
}

#[test]
fn price_minimal_prints_unit_price() {
    ntnb()
        .args(["-f", "minimal"])
        .args(PRICE_ARGS)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+(\.\d{1,2})?\n$").unwrap());
}

#[test]
fn price_rejects_maturity_before_settlement() {
    ntnb()
        .args([
            "price",
            "--settlement",
            "2025-11-25",
            "--maturity",
            "2025-11-25",
            "--yield",
            "6",
            "--vna",
            "4000",
            "--inflation",
            "0.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not after settlement"));
}

#[test]
fn price_reports_missing_vna() {
    ntnb()
        .args([
            "price",
            "--settlement",
            "2025-11-25",
            "--maturity",
            "2035-05-15",
            "--yield",
            "6",
            "--inflation",
            "0.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vna_previous"));
}

#[test]
fn price_uses_index_file() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.json");
    fs::write(
        &index,
        r#"{
            "reference_values": [{ "date": "2025-11-15", "value": 4400.0 }],
            "projected_inflation": [{ "year": 2025, "month": 11, "rate": 0.2 }]
        }"#,
    )
    .unwrap();

    ntnb()
        .args(["-f", "json", "price", "-s", "2025-11-25", "-m", "2035-05-15", "-y", "6"])
        .arg("--index")
        .arg(&index)
        .assert()
        .success()
        .stdout(predicate::str::contains("4400"));
}

#[test]
fn config_file_changes_policy() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ntnb.toml");
    fs::write(&config, "[pricing]\ncoupon_policy = \"compounded\"\n").unwrap();

    let output = ntnb()
        .args(["-f", "json", "--config"])
        .arg(&config)
        .args(PRICE_ARGS)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first_rate = json["cash_flows"][0]["coupon_rate"].as_f64().unwrap();
    assert!(first_rate < 2.96 && first_rate > 2.95);
}

#[test]
fn portfolio_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let rows = dir.path().join("positions.csv");
    fs::write(
        &rows,
        "id,name,quantity,settlement,maturity,contracted_yield,vna_previous,monthly_inflation\n\
         a,NTN-B 2035,2,2025-11-25,2035-05-15,6.1,4000,0.45\n\
         b,NTN-B 2050,1,2025-11-25,2050-08-15,6.3,4000,0.45\n",
    )
    .unwrap();

    ntnb()
        .arg("portfolio")
        .arg(&rows)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash Flows by Year"))
        .stdout(predicate::str::contains("NTN-B 2050"))
        .stdout(predicate::str::contains("2050"));
}

#[test]
fn portfolio_failure_names_position() {
    let dir = tempfile::tempdir().unwrap();
    let rows = dir.path().join("positions.json");
    fs::write(
        &rows,
        r#"[
            { "id": "good", "quantity": 1, "settlement": "2025-11-25", "maturity": "2035-05-15",
              "contracted_yield": 6, "vna_previous": 4000, "monthly_inflation": 0.5 },
            { "id": "holiday", "quantity": 1, "settlement": "2025-11-20", "maturity": "2035-05-15",
              "contracted_yield": 6, "vna_previous": 4000, "monthly_inflation": 0.5 }
        ]"#,
    )
    .unwrap();

    ntnb()
        .arg("portfolio")
        .arg(&rows)
        .assert()
        .failure()
        .stderr(predicate::str::contains("holiday"))
        .stderr(predicate::str::contains("not a business day"));
}

#[test]
fn calendar_lists_holidays() {
    ntnb()
        .args(["calendar", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-13"))
        .stdout(predicate::str::contains("2024-03-29"))
        .stdout(predicate::str::contains("Sexta-feira Santa"));
}

#[test]
fn calendar_check_and_count() {
    ntnb()
        .args(["-f", "minimal", "calendar", "--check", "2025-11-20"])
        .assert()
        .success()
        .stdout("false\n");

    ntnb()
        .args(["-f", "minimal", "calendar", "--from", "2025-11-24", "--to", "2025-11-29"])
        .assert()
        .success()
        .stdout("5\n");
}
