use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};

fn bookflow(args: &[&str], home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bookflow"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("BOOKFLOW_API_BASE")
        .env_remove("BOOKFLOW_LOG")
        .output()
        .expect("run bookflow")
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).expect("serialize")).expect("write");
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn normalize_prints_canonical_config() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let service = dir.path().join("service.json");
    write_json(
        &service,
        &json!({"slug": "handyman-repairs", "bullets": ["Mounting"]}),
    );
    let output = bookflow(
        &["normalize", "--service", service.to_str().expect("utf-8 path")],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let config = stdout_json(&output);
    let tags: Vec<&str> = config["bookingBlocks"]
        .as_array()
        .expect("blocks")
        .iter()
        .filter_map(|block| block["type"].as_str())
        .collect();
    assert_eq!(
        tags,
        ["SUB_SERVICE", "HANDYMAN_JOB_TYPE", "JOB_DESCRIPTION", "SIMPLE_NOTE"]
    );
}

#[test]
fn strict_normalize_fails_on_malformed_blocks() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let service = dir.path().join("service.json");
    write_json(&service, &json!({"slug": "x", "bookingBlocks": [true]}));
    let path = service.to_str().expect("utf-8 path");

    let lenient = bookflow(&["normalize", "--service", path], dir.path());
    assert!(lenient.status.success());
    assert_eq!(stdout_json(&lenient)["bookingBlocks"], json!([]));

    let strict = bookflow(&["normalize", "--strict", "--service", path], dir.path());
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("booking block 0"));
}

#[test]
fn run_prints_review_and_payload() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let service = dir.path().join("service.json");
    let answers = dir.path().join("answers.json");
    write_json(
        &service,
        &json!({"slug": "handyman-repairs", "title": "Handyman", "bullets": ["Mounting"]}),
    );
    write_json(
        &answers,
        &json!({
            "blocks": {
                "SUB_SERVICE": "Mounting",
                "HANDYMAN_JOB_TYPE": "Mounting",
                "JOB_DESCRIPTION": "Hang a 55in TV"
            },
            "schedule": {"date": "2026-11-07", "timeFrom": "13:00", "timeTo": "15:00"},
            "address": {"line1": "3 Bay St", "city": "Toronto", "postalCode": "M5J 2N8"}
        }),
    );
    let output = bookflow(
        &[
            "run",
            "--service",
            service.to_str().expect("utf-8 path"),
            "--answers",
            answers.to_str().expect("utf-8 path"),
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report = stdout_json(&output);
    assert_eq!(report["payload"]["serviceSlug"], "handyman-repairs");
    assert_eq!(report["payload"]["extras"]["jobDescription"], "Hang a 55in TV");
    assert_eq!(report["review"]["schedule"]["window"], "13:00-15:00");
    assert!(report.get("receipt").is_none());
}

#[test]
fn run_names_the_blocked_step() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let service = dir.path().join("service.json");
    let answers = dir.path().join("answers.json");
    write_json(&service, &json!({"slug": "cleaning", "bullets": ["Home clean"]}));
    write_json(&answers, &json!({"blocks": {"SUB_SERVICE": "Home clean"}}));
    let output = bookflow(
        &[
            "run",
            "--service",
            service.to_str().expect("utf-8 path"),
            "--answers",
            answers.to_str().expect("utf-8 path"),
        ],
        dir.path(),
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("blocked at DETAILS"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn init_writes_config_and_refuses_to_clobber() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = dir.path().join("conf").join("config.json");
    let path = config.to_str().expect("utf-8 path");

    let first = bookflow(&["init", "--config", path], dir.path());
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&config).expect("read config"))
            .expect("config JSON");
    assert_eq!(written["schema_version"], 1);

    let second = bookflow(&["init", "--config", path], dir.path());
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    let forced = bookflow(&["init", "--config", path, "--force"], dir.path());
    assert!(forced.status.success());
}
