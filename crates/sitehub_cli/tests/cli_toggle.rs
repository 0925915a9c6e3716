use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sitehub-{nanos}-{file_name}"))
}

fn write_config(path: &PathBuf) {
    let content = serde_json::json!({
        "site": "Harbor North",
        "members": [
            {"id": "oliver", "name": "Oliver", "role": "bpo", "pin": "1111"},
            {"id": "emil", "name": "Emil", "role": "BPO", "pin": "2222"},
            {"id": "martin", "name": "Martin", "role": "koordinator", "pin": "4444"},
            {"id": "jon", "name": "Jon", "role": "logistics", "pin": "9999"}
        ],
        "opening_tasks": ["Unlock the gate"],
        "closing_tasks": ["Lock the gate"]
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn write_store(path: &PathBuf, completions: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "days": {
            "2026-03-01": {
                "date": "2026-03-01",
                "site": "Harbor North",
                "tasks": [
                    {
                        "id": "t1",
                        "text": "Unlock the gate",
                        "category": "opening",
                        "completions": completions,
                        "created_at": "2026-03-01T06:00:00Z"
                    },
                    {
                        "id": "t2",
                        "text": "Lock the gate",
                        "category": "closing",
                        "completions": [],
                        "created_at": "2026-03-01T06:00:00Z"
                    }
                ],
                "approved": false,
                "approved_by": null,
                "approved_at": null,
                "log": []
            }
        }
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn run(args: &[&str], store_path: &PathBuf, config_path: &PathBuf) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_sitehub");
    Command::new(exe)
        .args(args)
        .env("SITEHUB_STORE_PATH", store_path)
        .env("SITEHUB_CONFIG_PATH", config_path)
        .output()
        .expect("failed to run sitehub")
}

fn load_day(store_path: &PathBuf) -> serde_json::Value {
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store_path).unwrap()).unwrap();
    stored["days"]["2026-03-01"].clone()
}

#[test]
fn worker_toggle_signs_task() {
    let store_path = temp_path("toggle-sign.json");
    let config_path = temp_path("toggle-sign-config.json");
    write_config(&config_path);
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &[
            "toggle", "t1", "--user", "oliver", "--pin", "1111", "--date", "2026-03-01",
        ],
        &store_path,
        &config_path,
    );

    let day = load_day(&store_path);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Oliver completed: Unlock the gate"));

    let completions = day["tasks"][0]["completions"].as_array().unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0]["name"], "Oliver");
    assert!(completions[0]["signed_at"].is_string());
    assert_eq!(day["log"].as_array().unwrap().len(), 1);
}

#[test]
fn second_toggle_removes_own_signature() {
    let store_path = temp_path("toggle-remove.json");
    let config_path = temp_path("toggle-remove-config.json");
    write_config(&config_path);
    write_store(&store_path, serde_json::json!([]));

    let args = [
        "toggle", "t1", "--user", "oliver", "--pin", "1111", "--date", "2026-03-01",
    ];
    run(&args, &store_path, &config_path);
    let output = run(&args, &store_path, &config_path);

    let day = load_day(&store_path);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Oliver removed: Unlock the gate"));
    assert!(day["tasks"][0]["completions"].as_array().unwrap().is_empty());
    assert_eq!(day["log"].as_array().unwrap().len(), 2);
}

#[test]
fn coordinator_toggle_resets_every_signature() {
    let store_path = temp_path("toggle-reset.json");
    let config_path = temp_path("toggle-reset-config.json");
    write_config(&config_path);
    write_store(
        &store_path,
        serde_json::json!([
            {"name": "Oliver", "signed_at": "2026-03-01T07:00:00Z"},
            {"name": "Emil", "signed_at": "2026-03-01T07:05:00Z"}
        ]),
    );

    let output = run(
        &[
            "toggle", "t1", "--user", "martin", "--pin", "4444", "--date", "2026-03-01",
        ],
        &store_path,
        &config_path,
    );

    let day = load_day(&store_path);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Martin reset: Unlock the gate"));
    assert!(day["tasks"][0]["completions"].as_array().unwrap().is_empty());
}

#[test]
fn lead_cannot_toggle_tasks() {
    let store_path = temp_path("toggle-lead.json");
    let config_path = temp_path("toggle-lead-config.json");
    write_config(&config_path);
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &[
            "toggle", "t1", "--user", "jon", "--pin", "9999", "--date", "2026-03-01",
        ],
        &store_path,
        &config_path,
    );

    let day = load_day(&store_path);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: permission_denied"));
    assert!(day["tasks"][0]["completions"].as_array().unwrap().is_empty());
    assert!(day["log"].as_array().unwrap().is_empty());
}

#[test]
fn toggle_requires_credentials() {
    let store_path = temp_path("toggle-anon.json");
    let config_path = temp_path("toggle-anon-config.json");
    write_config(&config_path);
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &["toggle", "t1", "--date", "2026-03-01"],
        &store_path,
        &config_path,
    );
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn toggle_rejects_wrong_pin() {
    let store_path = temp_path("toggle-wrong-pin.json");
    let config_path = temp_path("toggle-wrong-pin-config.json");
    write_config(&config_path);
    write_store(&store_path, serde_json::json!([]));

    let output = run(
        &[
            "toggle", "t1", "--user", "oliver", "--pin", "0000", "--date", "2026-03-01",
        ],
        &store_path,
        &config_path,
    );

    let day = load_day(&store_path);
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_credentials"));
    assert!(day["log"].as_array().unwrap().is_empty());
}
