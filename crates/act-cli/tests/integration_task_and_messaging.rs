//! Integration tests covering task create/update and inbox messaging via
//! the `act` binary.

use assert_cmd::cargo;
use tempfile::TempDir;

fn set_home_env(cmd: &mut assert_cmd::Command, temp_dir: &TempDir) {
    cmd.env("ACT_HOME", temp_dir.path());
}

fn create_team(temp_dir: &TempDir, team: &str) {
    let mut cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut cmd, temp_dir);
    cmd.args(["team", "create", team]).assert().success();
}

#[test]
fn test_task_create_then_update_to_in_progress() {
    let temp_dir = TempDir::new().unwrap();
    create_team(&temp_dir, "demo");

    let mut create_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut create_cmd, &temp_dir);
    let output = create_cmd
        .args(["task", "create", "demo", "write docs", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let task: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let mut update_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut update_cmd, &temp_dir);
    update_cmd
        .args(["task", "update", "demo", &task_id, "--status", "in_progress", "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("in_progress"));
}

#[test]
fn test_task_update_rejects_status_regression() {
    let temp_dir = TempDir::new().unwrap();
    create_team(&temp_dir, "demo");

    let mut create_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut create_cmd, &temp_dir);
    let output = create_cmd
        .args(["task", "create", "demo", "write docs", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let task: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let task_id = task["id"].as_str().unwrap().to_string();

    let mut complete_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut complete_cmd, &temp_dir);
    complete_cmd
        .args(["task", "update", "demo", &task_id, "--status", "completed"])
        .assert()
        .success();

    let mut regress_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut regress_cmd, &temp_dir);
    regress_cmd
        .args(["task", "update", "demo", &task_id, "--status", "pending"])
        .assert()
        .failure();
}

fn add_teammate(temp_dir: &TempDir, team: &str, name: &str) {
    act_core::team::add_member(
        team,
        act_core::schema::Member::Teammate(act_core::schema::TeammateMember {
            agent_id: format!("{name}@{team}"),
            name: name.to_string(),
            agent_type: "general-purpose".into(),
            model: "sonnet".into(),
            prompt: "hi".into(),
            color: "blue".into(),
            plan_mode_required: false,
            joined_at: 0,
            multiplexer_target_id: String::new(),
            cwd: "/workspace".into(),
            subscriptions: vec![],
            backend_kind: Default::default(),
            remote_session_id: None,
            is_active: false,
            unknown_fields: Default::default(),
        }),
        Some(temp_dir.path()),
    )
    .unwrap();
}

#[test]
fn test_send_message_then_read_inbox() {
    let temp_dir = TempDir::new().unwrap();
    create_team(&temp_dir, "demo");
    add_teammate(&temp_dir, "demo", "poet");

    let mut send_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut send_cmd, &temp_dir);
    send_cmd
        .args(["send", "demo", "message", "--from", "poet", "--recipient", "team-lead", "--content", "status update", "--summary", "status"])
        .assert()
        .success();

    let mut read_cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut read_cmd, &temp_dir);
    read_cmd
        .args(["inbox", "read", "demo", "team-lead"])
        .assert()
        .success()
        .stdout(predicates::str::contains("status update"));
}

#[test]
fn test_send_rejects_unknown_kind() {
    let temp_dir = TempDir::new().unwrap();
    create_team(&temp_dir, "demo");

    let mut cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut cmd, &temp_dir);
    cmd.args(["send", "demo", "smoke_signal"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown message type"));
}

#[test]
fn test_inbox_poll_times_out_when_empty() {
    let temp_dir = TempDir::new().unwrap();
    create_team(&temp_dir, "demo");

    let mut cmd = cargo::cargo_bin_cmd!("act");
    set_home_env(&mut cmd, &temp_dir);
    cmd.args(["inbox", "poll", "demo", "team-lead", "--timeout-ms", "200"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No messages"));
}
