//! E2E tests for the vatc commands against the sample ledger

use serde_json::Value;
use std::process::{Command, Output};

const LEDGER: &str = "tests/data/ledger.json";
const CSV: &str = "tests/data/transactions.csv";

fn vatc(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn vatc_json(args: &[&str]) -> Value {
    let output = vatc(args);
    assert!(output.status.success(), "Command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn calculate_standard_uses_invoices() {
    let json = vatc_json(&[
        "calculate", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31", "--json",
    ]);

    let boxes = &json["boxes"];
    assert_eq!(boxes["box1"], 24000);
    assert_eq!(boxes["box3"], 24000);
    assert_eq!(boxes["box4"], 6000);
    assert_eq!(boxes["box5"], 18000);
    assert_eq!(boxes["box6"], 120000);
    assert_eq!(boxes["box7"], 30000);
    assert_eq!(boxes["metadata"]["invoice_count"], 1);
    assert_eq!(json["scheme"], "standard");
    assert_eq!(json["validation"]["is_valid"], true);
}

#[test]
fn calculate_cash_counts_settled_records_only() {
    let json = vatc_json(&[
        "calculate", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
        "--scheme", "cash", "--breakdown", "--json",
    ]);

    assert_eq!(json["boxes"]["box1"], 20000);
    assert_eq!(json["boxes"]["box6"], 100000);
    assert_eq!(json["boxes"]["box5"], 14000);
    assert_eq!(json["boxes"]["metadata"]["invoice_count"], 0);
    assert_eq!(json["breakdown"]["output_source"], "income_transactions");
    assert!(json["breakdown"]["invoices"].is_null());
}

#[test]
fn calculate_text_output() {
    let output = vatc(&[
        "calculate", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("VAT due on sales"));
    assert!(stdout.contains("£240.00"));
    assert!(stdout.contains("VAT payable to HMRC: £180.00"));
}

#[test]
fn calculate_other_user() {
    let json = vatc_json(&[
        "calculate", "-l", LEDGER, "-u", "2", "--start", "2024-01-01", "--end", "2024-03-31",
        "--json",
    ]);
    assert_eq!(json["boxes"]["box1"], 1000);
    assert_eq!(json["user_id"], 2);
}

#[test]
fn calculate_from_csv_rounds_fractional_pence() {
    let json = vatc_json(&[
        "calculate", "-l", CSV, "--start", "2024-01-01", "--end", "2024-03-31", "--json",
    ]);
    assert_eq!(json["boxes"]["box1"], 30000);
    assert_eq!(json["boxes"]["box4"], 6001);
    assert_eq!(json["boxes"]["box5"], 23999);
    assert_eq!(json["boxes"]["box7"], 30001);
}

#[test]
fn calculate_rejects_invalid_dates() {
    let output = vatc(&[
        "calculate", "-l", LEDGER, "--start", "2024-13-01", "--end", "2024-03-31",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("period_start"), "stderr: {}", stderr);
}

#[test]
fn calculate_rejects_unknown_scheme() {
    let output = vatc(&[
        "calculate", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
        "--scheme", "flat",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("accounting_scheme"), "stderr: {}", stderr);
}

#[test]
fn prepare_prints_draft() {
    let json = vatc_json(&[
        "prepare", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
    ]);
    assert_eq!(json["status"], "draft");
    assert_eq!(json["box5"], 18000);
    assert_eq!(json["period"]["start"], "2024-01-01");
}

#[test]
fn preview_in_welsh() {
    let json = vatc_json(&[
        "preview", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
        "--language", "cy", "--json",
    ]);
    assert_eq!(json["summary"]["language"], "cy");
    let name = json["summary"]["boxes"][0]["name"].as_str().unwrap();
    assert!(name.contains("TAW"), "name: {}", name);
    assert_eq!(json["submission"]["vatDueSales"], 240.0);
    assert_eq!(json["submission"]["netVatDue"], 180.0);
    assert!(json["result"]["breakdown"].is_object());
}

#[test]
fn compare_quarters() {
    let json = vatc_json(&[
        "compare", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
        "--prev-start", "2023-10-01", "--prev-end", "2023-12-31", "--json",
    ]);
    let box5 = &json["changes"][4];
    assert_eq!(box5["current"], 18000);
    assert_eq!(box5["previous"], 12000);
    assert_eq!(box5["change"], 6000);
    assert_eq!(box5["percent_change"], 50.0);
}

#[test]
fn compare_reports_prefixed_errors() {
    let output = vatc(&[
        "compare", "-l", LEDGER, "--start", "2024-01-01", "--end", "2024-03-31",
        "--prev-start", "2023-12-31", "--prev-end", "2023-10-01",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("previous_period_end"), "stderr: {}", stderr);
}

#[test]
fn estimate_averages_filed_returns() {
    let json = vatc_json(&["estimate", "-l", LEDGER, "--json"]);
    assert_eq!(json["estimated"], true);
    assert_eq!(json["periods_used"], 2);
    assert_eq!(json["averages"]["box1"], 13000);
    assert_eq!(json["averages"]["box5"], 10000);
    assert_eq!(json["estimated_net_vat"], 10000);

    let latest = vatc_json(&["estimate", "-l", LEDGER, "-p", "1", "--json"]);
    assert_eq!(latest["periods_used"], 1);
    assert_eq!(latest["averages"]["box5"], 12000);
}

#[test]
fn estimate_without_returns() {
    let json = vatc_json(&["estimate", "-l", CSV, "--json"]);
    assert_eq!(json["estimated"], false);
    assert!(json["averages"].is_null());
}

#[test]
fn stats_for_year() {
    let json = vatc_json(&["stats", "-l", LEDGER, "--year", "2024", "--json"]);
    assert_eq!(json["income"]["count"], 2);
    assert_eq!(json["income"]["vat"], 30000);
    assert_eq!(json["expenses"]["count"], 1);
    assert_eq!(json["invoices"]["count"], 1);
    assert_eq!(json["returns"]["count"], 1);
}

#[test]
fn check_matching_return() {
    let output = vatc(&["check", "-l", LEDGER, "--return-id", "r1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("match"));
}

#[test]
fn check_drifted_return_fails() {
    let output = vatc(&["check", "-l", LEDGER, "--return-id", "r2", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["return_id"], "r2");
    assert_eq!(json["is_valid"], false);
    let first = &json["discrepancies"][0];
    assert_eq!(first["key"], "box1");
    assert_eq!(first["difference"], -10000);
}

#[test]
fn check_drifted_return_prints_table_before_failing() {
    let output = vatc(&["check", "-l", LEDGER, "--return-id", "r2"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("SAVED RETURN r2"), "stdout: {}", stdout);
    assert!(stdout.contains("differ from the ledger"), "stdout: {}", stdout);
    assert!(stdout.contains("-£100.00"), "stdout: {}", stdout);
}

#[test]
fn calculate_rejects_csv_amount_beyond_range() {
    let dir = std::env::temp_dir().join(format!("vatc-range-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("huge.csv");
    std::fs::write(
        &path,
        "id,user_id,date,kind,net,vat,status,description\n\
         t1,,2024-01-15,income,10000000000000000000,0,cleared,\n",
    )
    .unwrap();

    let output = vatc(&[
        "calculate", "-l", path.to_str().unwrap(), "--start", "2024-01-01", "--end", "2024-03-31",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("does not fit in pence"), "stderr: {}", stderr);
}

#[test]
fn schema_csv_header() {
    let output = vatc(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout.trim(), "id,user_id,date,kind,net,vat,status,description");
}

#[test]
fn schema_json_describes_ledger() {
    let json = vatc_json(&["schema"]);
    let properties = &json["properties"];
    assert!(properties["transactions"].is_object());
    assert!(properties["invoices"].is_object());
    assert!(properties["returns"].is_object());
}
