use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn amort() -> Command {
    Command::cargo_bin("amort").unwrap()
}

#[test]
fn test_plan_json_from_flags() {
    let output = amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["summary"]["monthly_payment"], "887.72");
    assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 12);
    assert_eq!(value["result"]["schedule"][11]["remaining_balance"], "0");
}

#[test]
fn test_plan_minimal_output() {
    amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12", "--output", "minimal"])
        .assert()
        .success()
        .stdout("887.72\n");
}

#[test]
fn test_plan_table_output() {
    amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12", "--output", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saldo Restante"))
        .stdout(predicate::str::contains("$10,652.67"));
}

#[test]
fn test_plan_from_stdin() {
    amort()
        .args(["plan", "--output", "minimal"])
        .write_stdin(r#"{"annual_rate_percent": "12.5", "principal": "10000", "term_months": 12}"#)
        .assert()
        .success()
        .stdout("887.72\n");
}

#[test]
fn test_plan_from_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loan.json");
    fs::write(&path, r#"{"annual_rate_percent": "100", "principal": "1", "term_months": 360}"#).unwrap();

    let output = amort()
        .args(["plan", "--input", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 360);
}

#[test]
fn test_plan_exports_workbook_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("Plan_Amortizacion.xlsx");
    let csv = dir.path().join("plan.csv");

    amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12"])
        .arg("--xlsx")
        .arg(&xlsx)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success();

    assert!(fs::metadata(&xlsx).unwrap().len() > 0);
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("Mes,Pago Mensual,Interés,Abono a Capital,Saldo Restante\n"));
    assert_eq!(text.lines().count(), 13);
}

#[test]
fn test_plan_default_workbook_name() {
    let dir = tempfile::tempdir().unwrap();
    amort()
        .current_dir(dir.path())
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12", "--xlsx"])
        .assert()
        .success();
    assert!(dir.path().join("Plan_Amortizacion.xlsx").exists());
}

#[test]
fn test_failed_export_still_prints_plan() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("missing").join("plan.xlsx");

    amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "12", "--output", "minimal"])
        .arg("--xlsx")
        .arg(&bad)
        .assert()
        .code(2)
        .stdout("887.72\n")
        .stderr(predicate::str::contains("schedule export failed"));
}

#[test]
fn test_zero_term_reports_invalid_input() {
    amort()
        .args(["plan", "--rate", "12.5", "--principal", "10000", "--term", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid input: term_months"));
}

#[test]
fn test_missing_flag_reported() {
    amort()
        .args(["plan", "--rate", "12.5", "--term", "12"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--principal is required"));
}

#[test]
fn test_interactive_session() {
    let dir = tempfile::tempdir().unwrap();
    amort()
        .arg("interactive")
        .arg("--save-dir")
        .arg(dir.path())
        .write_stdin("12.5\n10000\n12\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("$887.72"))
        .stdout(predicate::str::contains("ha sido guardado en"));
    assert!(dir.path().join("Plan_Amortizacion.xlsx").exists());
}
