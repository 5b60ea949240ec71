//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_deskmate"))
        .args(args)
        .env("DESKMATE_DATA_DIR", data_dir)
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

const QUIZ: &str = r#"```json
[
  {"question": "2 + 2?", "options": ["A. 3", "B. 4", "C. 5"], "answer": "4", "explanation": "Arithmetic."},
  {"question": "Capital of France?", "options": ["Paris", "Rome"], "answer": "Paris"}
]
```"#;

#[test]
fn test_quiz_grade() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["quiz", "grade", "B. Paris", "Paris, France"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let args = ["quiz", "grade", "B. Paris", "Paris, France", "--exact"];
    let (code, stdout, _) = run_cli(dir.path(), &args);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_quiz_take_with_answers() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("quiz.json");
    std::fs::write(&file, QUIZ).unwrap();
    let file = file.to_str().unwrap();

    let (code, stdout, stderr) =
        run_cli(dir.path(), &["quiz", "take", file, "--answers", "B,Rome"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Score: 1 / 2"));

    let (code, stdout, _) =
        run_cli(dir.path(), &["quiz", "take", file, "--answers", "2,", "--json"]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["score"], 1);
    assert_eq!(report["total"], 2);
    assert!(report["results"][1]["selected"].is_null());
}

#[test]
fn test_quiz_take_rejects_unknown_choice() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("quiz.json");
    std::fs::write(&file, QUIZ).unwrap();

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["quiz", "take", file.to_str().unwrap(), "--answers", "Z"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_quiz_generate_without_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("notes.txt");
    std::fs::write(&source, "Photosynthesis turns light into chemical energy.").unwrap();

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["quiz", "generate", "--source", source.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("API key"));
}

#[test]
fn test_overtime_add_list_summary_delete() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();

    let (code, stdout, stderr) = run_cli(
        d,
        &[
            "overtime", "add", "--date", "2024-03-01", "--start", "18:00", "--end", "23:00",
            "--owner", "emp-8", "--wage", "300",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["day_kind"], "workday");
    assert_eq!(record["total_pay"], 2400);

    let (code, stdout, _) = run_cli(d, &["overtime", "list", "--owner", "emp-8"]);
    assert_eq!(code, 0);
    let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);

    let (code, stdout, _) = run_cli(
        d,
        &["overtime", "summary", "--period", "2024-03", "--owner", "emp-8"],
    );
    assert_eq!(code, 0);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["total_pay"], 2400);
    assert_eq!(summary["record_count"], 1);

    let (code, stdout, _) = run_cli(
        d,
        &["overtime", "delete", "--date", "2024-03-01", "--owner", "emp-8"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("deleted 1 record(s)"));

    let (code, _, _) = run_cli(
        d,
        &["overtime", "delete", "--date", "2024-03-01", "--owner", "emp-8"],
    );
    assert_eq!(code, 1);
}

#[test]
fn test_overtime_uses_config_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();

    assert_eq!(run_cli(d, &["config", "set", "overtime.default_owner", "emp-1"]).0, 0);
    assert_eq!(run_cli(d, &["config", "set", "overtime.hourly_wage", "200"]).0, 0);
    assert_eq!(run_cli(d, &["config", "set", "overtime.backend", "ledger"]).0, 0);

    // 2024-03-02 is a Saturday.
    let (code, stdout, stderr) = run_cli(
        d,
        &["overtime", "add", "--date", "2024-03-02", "--start", "09:00", "--end", "12:00"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["owner_key"], "emp-1");
    assert_eq!(record["day_kind"], "holiday");
    assert!(d.join("overtime.csv").exists());

    let out = d.join("export.csv");
    let (code, _, _) = run_cli(d, &["overtime", "export", "--out", out.to_str().unwrap()]);
    assert_eq!(code, 0);
    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with(
        "date,owner_key,type,total_hours,hourly_wage,tier_a_hours,tier_b_hours,tier_c_hours,total_pay\n"
    ));
    assert!(csv.contains("2024-03-02,emp-1,holiday,"));
}

#[test]
fn test_overtime_export_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    let (code, _, stderr) = run_cli(
        d,
        &[
            "overtime", "add", "--date", "2024-03-01", "--start", "18:00", "--end", "21:00",
            "--owner", "emp-8", "--wage", "300",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let inferred = d.join("pay.xlsx");
    let (code, stdout, _) = run_cli(d, &["overtime", "export", "--out", inferred.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("exported 1 record(s)"));
    assert!(std::fs::read(&inferred).unwrap().starts_with(b"PK"));

    let forced = d.join("pay.dat");
    let args = ["overtime", "export", "--out", forced.to_str().unwrap(), "--format", "xlsx"];
    assert_eq!(run_cli(d, &args).0, 0);
    assert!(std::fs::read(&forced).unwrap().starts_with(b"PK"));

    let (code, _, _) = run_cli(d, &["overtime", "export", "--out", "x", "--format", "pdf"]);
    assert_ne!(code, 0);
}

#[test]
fn test_overtime_add_requires_owner() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["overtime", "add", "--start", "18:00", "--end", "20:00", "--wage", "100"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("no owner"));
}

#[test]
fn test_overtime_kind() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["overtime", "kind", "2024-10-10"]);
    assert_eq!(stdout.trim(), "holiday");
    let (_, stdout, _) = run_cli(dir.path(), &["overtime", "kind", "2024-10-09"]);
    assert_eq!(stdout.trim(), "workday");
}

#[test]
fn test_overtime_bad_period_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["overtime", "summary", "--period", "2024-13"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();

    let (code, stdout, _) = run_cli(d, &["config", "get", "quiz.question_count"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    assert_eq!(run_cli(d, &["config", "set", "quiz.question_count", "5"]).0, 0);
    let (_, stdout, _) = run_cli(d, &["config", "get", "quiz.question_count"]);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(d, &["config", "set", "quiz.question_count", "many"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(d, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("deskmate"));
}
