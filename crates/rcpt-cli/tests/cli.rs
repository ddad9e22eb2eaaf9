use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../rcpt-core/fixtures")
        .join(name)
}

fn rcpt() -> Command {
    Command::cargo_bin("rcpt").unwrap()
}

#[test]
fn process_emart_json() {
    rcpt()
        .arg("process")
        .arg(fixture("emart_paju.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""store_name":"이마트파주점""#))
        .stdout(predicate::str::contains(r#""total_amount":70950"#))
        .stdout(predicate::str::contains(r#""date":"2025-03-02""#))
        .stdout(predicate::str::contains(r#""retailer":"emart""#));
}

#[test]
fn process_traders_csv() {
    rcpt()
        .args(["process", "-f", "csv"])
        .arg(fixture("traders_kintex.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("명산지기장미역,7780,1,7780"));
}

#[test]
fn process_upload_payload() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("upload.json");
    let text = fs::read_to_string(fixture("emart_paju.txt")).unwrap();
    fs::write(
        &payload,
        serde_json::json!({ "imageId": "img-1", "ocrText": text }).to_string(),
    )
    .unwrap();

    rcpt()
        .arg("process")
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""vat_amount":2053"#));
}

#[test]
fn process_stdin() {
    rcpt()
        .args(["process", "-f", "text", "-"])
        .write_stdin(fs::read_to_string(fixture("emart_paju.txt")).unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 70,950 KRW"));
}

#[test]
fn process_unsupported_receipt_fails() {
    rcpt()
        .args(["process", "-"])
        .write_stdin("홈 플 러 스 강 서 점 결 제 대 상 금 액 12,000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported receipt format"));
}

#[test]
fn process_lenient_returns_partial_record() {
    rcpt()
        .args(["process", "--lenient", "-"])
        .write_stdin("홈 플 러 스 강 서 점 결 제 대 상 금 액 12,000")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""total_amount":12000"#))
        .stdout(predicate::str::contains("store_name").not());
}

#[test]
fn process_missing_input_fails() {
    rcpt()
        .args(["process", "no-such-receipt.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_with_summary() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    fs::copy(fixture("emart_paju.txt"), input.path().join("emart.txt")).unwrap();
    fs::copy(fixture("traders_kintex.txt"), input.path().join("traders.txt")).unwrap();
    fs::write(input.path().join("blank.txt"), "홈 플 러 스").unwrap();

    let pattern = input.path().join("*.txt");

    rcpt()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("-o")
        .arg(output.path())
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 1 failed"));

    assert!(output.path().join("emart.json").exists());
    assert!(output.path().join("traders.json").exists());
    assert!(!output.path().join("blank.json").exists());

    let summary = fs::read_to_string(output.path().join("summary.csv")).unwrap();
    assert!(summary.contains("emart.txt,success,emart,이마트파주점,2025-03-02,70950,2053,8,"));
    assert!(summary.contains("blank.txt,error"));
}

#[test]
fn batch_stops_on_first_error() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("blank.txt"), "홈 플 러 스").unwrap();

    rcpt()
        .arg("batch")
        .arg(input.path().join("*.txt").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn formats_lists_registry_order() {
    rcpt()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)emart.*traders").unwrap());
}

#[test]
fn config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    rcpt()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "items.tolerance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000"));

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "extraction.mode", "lenient"])
        .assert()
        .success();

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "extraction.retailers", "[]"])
        .assert()
        .failure();

    // Lenient mode from config applies without --lenient
    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["process", "-"])
        .write_stdin("결 제 대 상 금 액 12,000")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""layout":"emart""#));
}
