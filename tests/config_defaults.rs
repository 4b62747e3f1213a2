use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn tm(data_dir: &TempDir, config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tm").expect("binary");
    cmd.env("TM_DATA_DIR", data_dir.path());
    cmd.env("TM_CONFIG", config);
    cmd.env_remove("TM_EVENTS");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_view_defaults_apply_when_flags_absent() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("tm.toml");
    std::fs::write(
        &config,
        "[view]\ndefault_sort = \"priority\"\ndefault_direction = \"desc\"\n",
    )
    .expect("write config");

    tm(&dir, &config).args(["add", "minor"]).assert().success();
    tm(&dir, &config).args(["add", "urgent"]).assert().success();

    // Raise the second task's priority, then list with no flags: the
    // configured priority-desc default puts it first.
    let output = tm(&dir, &config)
        .args(["--json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let envelope: serde_json::Value = serde_json::from_slice(&output).expect("json envelope");
    let urgent_id = envelope["data"]["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .find(|t| t["text"] == "urgent")
        .expect("urgent task")["id"]
        .as_str()
        .expect("id")
        .to_string();

    tm(&dir, &config)
        .args(["edit", &urgent_id, "--priority", "high"])
        .assert()
        .success();

    let output = tm(&dir, &config)
        .args(["--json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let envelope: serde_json::Value = serde_json::from_slice(&output).expect("json envelope");
    assert_eq!(envelope["data"]["criteria"]["sort"], "priority");
    assert_eq!(envelope["data"]["tasks"][0]["text"], "urgent");
    assert_eq!(envelope["data"]["tasks"][1]["text"], "minor");
}

#[test]
fn config_display_ms_stamps_notices() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("tm.toml");
    std::fs::write(&config, "[notify]\ndisplay_ms = 1500\n").expect("write config");
    let events = dir.path().join("notices.jsonl");
    let events_arg = events.to_string_lossy().to_string();

    tm(&dir, &config)
        .args(["--events", &events_arg, "add", "short-lived"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&events).expect("read notices");
    let notice: serde_json::Value =
        serde_json::from_str(content.lines().next().expect("notice")).expect("parse");
    assert_eq!(notice["display_ms"], 1500);
}

#[test]
fn invalid_config_is_rejected_loudly_when_explicit() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("tm.toml");
    std::fs::write(&config, "[view]\ndefault_sort = \"alphabetical\"\n").expect("write config");

    tm(&dir, &config)
        .args(["list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid configuration"));
}
