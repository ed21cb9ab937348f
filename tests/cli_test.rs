mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let input = common::payments_csv(&[
        ["R1", "alice@example.com", "40000", "40000"],
        ["R2", "bad-email", "60000", "70000"],
        ["R3", "alice@example.com", "100", "100"],
        ["R4", "big@example.com", "1500000", "1500000"],
    ])?;

    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg(input.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "reference,accepted,classification,fee_percentage,fee_amount,final_amount,store_reference,message",
        ))
        .stdout(predicate::str::contains(
            "R1,true,EXACT,3.0,1200.00,41200.00,REF001,All checks passed",
        ))
        .stdout(predicate::str::contains(
            "R2,false,OVERPAYMENT,5.0,3000.00,63000.00,,Invalid email format. Over payment detected. Payment exceeds expected amount.",
        ))
        // R1 was accepted earlier in the same run
        .stdout(predicate::str::contains(
            "R3,false,EXACT,2.0,2.00,102.00,,Duplicate payment found for this email.",
        ))
        .stdout(predicate::str::contains("R4,false,EXACT,5.0,75000.00,1575000.00,,"))
        .stdout(predicate::str::contains("Amount exceeds maximum threshold of 1,000,000"));

    Ok(())
}

#[test]
fn test_cli_history_seeds_duplicates() -> Result<(), Box<dyn std::error::Error>> {
    let history = common::payments_csv(&[["H1", "carol@example.com", "500", "500"]])?;
    let input = common::payments_csv(&[
        ["R1", "CAROL@example.com", "500", "500"],
        ["R2", "dave@example.com", "500", "500"],
    ])?;

    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg(input.path()).arg("--history").arg(history.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "R1,false,EXACT,2.0,10.00,510.00,,Duplicate payment found for this email.",
        ))
        // H1 took REF001
        .stdout(predicate::str::contains(
            "R2,true,EXACT,2.0,10.00,510.00,REF002,All checks passed",
        ));

    Ok(())
}

#[test]
fn test_cli_first_failure_mode() -> Result<(), Box<dyn std::error::Error>> {
    let input = common::payments_csv(&[["R1", "bad-email", "100", "90"]])?;

    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg(input.path())
        .arg("--mode")
        .arg("first-failure")
        .arg("--format")
        .arg("json");

    let output = cmd.output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);

    let json: serde_json::Value = serde_json::from_str(lines[0])?;
    assert_eq!(json["reference"], "R1");
    assert_eq!(json["verdict"]["mode"], "first_failure");
    assert_eq!(json["verdict"]["rule"], "EmailValidation");
    assert_eq!(json["verdict"]["verdict"]["valid"], false);
    assert_eq!(json["verdict"]["verdict"]["errorKind"], "INVALID_EMAIL");
    assert_eq!(json["verdict"]["classification"], "UNDERPAYMENT");
    assert_eq!(json["storeReference"], serde_json::Value::Null);

    Ok(())
}

#[test]
fn test_cli_json_lines_per_payment() -> Result<(), Box<dyn std::error::Error>> {
    let input = common::generate_accepted_csv(5)?;

    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg(input.path()).arg("--format").arg("json");

    let output = cmd.output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let references: Vec<String> = stdout
        .lines()
        .map(|line| {
            let json: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(json["verdict"]["accepted"], true);
            json["storeReference"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(references, ["REF001", "REF002", "REF003", "REF004", "REF005"]);
    Ok(())
}

#[test]
fn test_cli_audit_logs_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let input = common::payments_csv(&[["R1", "erin@example.com", "100", "100"]])?;

    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg(input.path())
        .arg("--audit")
        .env_remove("RUST_LOG")
        .env("PAYMENT_CHECKS_LOG_LEVEL", "info");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("R1,true,EXACT"))
        .stderr(predicate::str::contains("EmailValidation"));

    Ok(())
}

#[test]
fn test_cli_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("payment-checks"));
    cmd.arg("does/not/exist.csv");

    cmd.assert().failure();
}
