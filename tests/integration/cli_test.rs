use anyhow::Result;
use std::fs;
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_pagesim");
const BELADY: &str = "1,2,3,4,1,2,5,1,2,3,4,5";

/// Compare prints one row per algorithm with its fault count
#[test]
fn test_cli_compare_command() -> Result<()> {
    let output = Command::new(BIN)
        .args(["-f", "3", "-r", BELADY, "compare"])
        .output()?;

    assert!(output.status.success(), "CLI compare command failed");

    let output_str = String::from_utf8(output.stdout)?;
    let row = |name: &str| {
        output_str
            .lines()
            .find(|line| line.starts_with(&format!("| {} ", name)))
            .map(str::to_string)
            .unwrap_or_default()
    };
    assert!(row("FIFO").contains("| 9 "), "FIFO row: {}", row("FIFO"));
    assert!(row("LRU").contains("| 10 "), "LRU row: {}", row("LRU"));
    assert!(row("OPTIMAL").contains("| 7 "), "OPTIMAL row: {}", row("OPTIMAL"));

    Ok(())
}

/// Run with --json streams one event per line followed by the snapshot
#[test]
fn test_cli_run_json_output() -> Result<()> {
    let output = Command::new(BIN)
        .args(["-f", "2", "-a", "lru", "-r", "1,2,1,3", "run", "--json"])
        .output()?;

    assert!(output.status.success(), "CLI run command failed");

    let output_str = String::from_utf8(output.stdout)?;
    let first: serde_json::Value = serde_json::from_str(output_str.lines().next().unwrap_or(""))?;
    assert_eq!(first["outcome"], "fault");
    assert_eq!(first["page_id"], 1);
    assert!(output_str.contains("\"completed\": true"));

    Ok(())
}

/// Report writes a text file with statistics and the event log
#[test]
fn test_cli_report_command() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let report_path = temp_dir.path().join("report.txt");

    let output = Command::new(BIN)
        .args(["-f", "3", "-a", "fifo", "-r", BELADY, "report", "--output"])
        .arg(&report_path)
        .output()?;

    assert!(output.status.success(), "CLI report command failed");

    let report = fs::read_to_string(&report_path)?;
    assert!(report.contains("Algorithm: FIFO"));
    assert!(report.contains("Page Faults: 9"));
    assert!(report.contains("[Step 1] Processing reference: 1"));
    assert!(report.contains("Simulation completed"));

    Ok(())
}

/// Tokens that are not references show up as warnings in the report
#[test]
fn test_cli_report_lists_dropped_tokens() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let report_path = temp_dir.path().join("report.txt");

    let output = Command::new(BIN)
        .args(["-f", "2", "-r", "1,x,3", "report", "--output"])
        .arg(&report_path)
        .output()?;

    assert!(output.status.success(), "CLI report command failed");

    let report = fs::read_to_string(&report_path)?;
    assert!(report.contains("[Step 1] Dropped invalid reference token 'x'"));
    assert!(report.contains("Page Faults: 2"));

    Ok(())
}

/// Configuration can come from a JSON file
#[test]
fn test_cli_config_file() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config_path = temp_dir.path().join("sim.json");
    fs::write(
        &config_path,
        r#"{
            "layout": { "frames": { "count": 3 } },
            "policy": "optimal",
            "reference_string": "1,2,3,4,1,2,5,1,2,3,4,5"
        }"#,
    )?;

    let output = Command::new(BIN)
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--json"])
        .output()?;

    assert!(output.status.success(), "CLI run with config file failed");
    let output_str = String::from_utf8(output.stdout)?;
    assert!(output_str.contains("\"policy\": \"optimal\""));
    assert!(output_str.contains("\"faults\": 7"));

    Ok(())
}

/// An empty reference string is rejected
#[test]
fn test_cli_rejects_empty_reference_string() -> Result<()> {
    let output = Command::new(BIN).args(["-r", " , ", "run"]).output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("no valid references"));

    Ok(())
}
