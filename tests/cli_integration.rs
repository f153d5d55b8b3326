use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn ecg_batch() -> Command {
    Command::cargo_bin("ecg-batch").unwrap()
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn ramp_signal(n_channels: usize, n_samples: usize) -> String {
    let rows: Vec<Vec<f64>> = (0..n_channels)
        .map(|c| (0..n_samples).map(|t| (c * 1000 + t) as f64).collect())
        .collect();
    serde_json::json!({ "signal": rows, "sampling_rate": 100.0 }).to_string()
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_help() {
    ecg_batch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    ecg_batch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ecg-batch"));
}

#[test]
fn test_help_flag() {
    ecg_batch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ECG signal"));
}

// =============================================================================
// STEPS SUBCOMMAND
// =============================================================================

#[test]
fn test_steps_subcommand() {
    ecg_batch()
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("segment"))
        .stdout(predicate::str::contains("random_segment"))
        .stdout(predicate::str::contains("band_pass"))
        .stdout(predicate::str::contains("symmetric"));
}

#[test]
fn test_steps_json() {
    let output = ecg_batch().args(["steps", "--json"]).assert().success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ops: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.get("op").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(
        ops,
        vec!["segment", "random_segment", "resample", "convolve", "band_pass", "gradient"]
    );
}

// =============================================================================
// INFO SUBCOMMAND
// =============================================================================

#[test]
fn test_info_text() {
    let input = write_temp(&ramp_signal(2, 50));
    ecg_batch()
        .args(["info", "--input", input.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Channels: 2"))
        .stdout(predicate::str::contains("Samples: 50"))
        .stdout(predicate::str::contains("100 Hz"));
}

#[test]
fn test_info_json() {
    let input = write_temp("[[1.0, 2.0, 3.0, 4.0]]");
    let output = ecg_batch()
        .args(["info", "--json", "--input", input.path().to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["n_channels"], 1);
    assert_eq!(parsed["n_samples"], 4);
    assert!(parsed["sampling_rate"].is_null());
    assert_eq!(parsed["channels"][0]["min"], 1.0);
    assert_eq!(parsed["channels"][0]["max"], 4.0);
    assert_eq!(parsed["channels"][0]["mean"], 2.5);
}

#[test]
fn test_info_missing_file() {
    ecg_batch()
        .args(["info", "--input", "/nonexistent/signal.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_info_ragged_signal() {
    let input = write_temp("[[1.0, 2.0], [3.0]]");
    ecg_batch()
        .args(["info", "--input", input.path().to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("channel 1"));
}

// =============================================================================
// RUN SUBCOMMAND
// =============================================================================

#[test]
fn test_run_requires_config() {
    ecg_batch()
        .args(["run", "--input", "signal.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn test_run_resample_then_segment() {
    let input = write_temp(&ramp_signal(2, 100));
    let config = write_temp(
        r#"{ "steps": [
            { "op": "resample", "new_length": 50 },
            { "op": "segment", "length": 10, "step": 10 }
        ] }"#,
    );

    let output = ecg_batch()
        .args([
            "run",
            "--compact",
            "--input",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["shape"], serde_json::json!([5, 2, 10]));
    assert_eq!(parsed["data"].as_array().unwrap().len(), 100);
    assert_eq!(parsed["sampling_rate"], 100.0);
    assert_eq!(parsed["steps"], serde_json::json!(["resample", "segment"]));
    // first sample of the first segment is untouched by resampling
    assert_eq!(parsed["data"][0], 0.0);
}

#[test]
fn test_run_writes_output_file() {
    let input = write_temp(&ramp_signal(1, 64));
    let config = write_temp(r#"{ "seed": 5, "steps": [ { "op": "random_segment", "length": 16, "n_segments": 3 } ] }"#);
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("result.json");

    ecg_batch()
        .args([
            "run",
            "--input",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed["shape"], serde_json::json!([3, 1, 16]));

    // each window of a ramp is a run of consecutive values
    let data: Vec<f64> = parsed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    for window in data.chunks(16) {
        assert!(window.windows(2).all(|w| w[1] - w[0] == 1.0));
    }
}

#[test]
fn test_run_invalid_config() {
    let input = write_temp(&ramp_signal(1, 10));
    let config = write_temp(r#"{ "steps": [ { "op": "convolve", "kernel": [] } ] }"#);
    ecg_batch()
        .args([
            "run",
            "--input",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("kernel"));
}

#[test]
fn test_run_invalid_sampling_rate_override() {
    let input = write_temp(&ramp_signal(1, 10));
    let config = write_temp(r#"{ "steps": [] }"#);
    ecg_batch()
        .args([
            "run",
            "--sr",
            "0",
            "--input",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sampling_rate"));
}

#[test]
fn test_run_step_failure_is_execution_error() {
    let input = write_temp(&ramp_signal(1, 10));
    let config = write_temp(r#"{ "steps": [ { "op": "segment", "length": 20, "step": 1 } ] }"#);
    ecg_batch()
        .args([
            "run",
            "--input",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pipeline failed"));
}
