use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn decisionlog(store: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("decisionlog-cli").unwrap();
    cmd.arg("--dir").arg(store.path());
    cmd
}

fn only_file_name(store: &TempDir) -> String {
    let mut names: Vec<String> = fs::read_dir(store.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1, "expected exactly one file: {names:?}");
    names.pop().unwrap()
}

fn show_json(store: &TempDir, file: &str) -> Value {
    let output = decisionlog(store)
        .args(["show", file, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn create_names_file_after_user() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "J. Doe"])
        .assert()
        .success()
        .stdout(predicates::str::contains("decisionlog_jdoe_"));

    let name = only_file_name(&store);
    assert!(name.starts_with("decisionlog_jdoe_"));
    assert!(name.ends_with(".json"));
}

#[test]
fn list_shows_created_files() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("No document files yet"));

    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    decisionlog(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("decisionlog_jdoe_"));
}

#[test]
fn decide_appends_a_decision() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    let file = only_file_name(&store);

    decisionlog(&store)
        .args([
            "decide",
            &file,
            "--title",
            "Accept offer",
            "--date",
            "2024-03-01",
            "--importance",
            "4",
            "--tag",
            "career",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("Recorded decision"));

    let doc = show_json(&store, &file);
    let decisions = doc["decisions"].as_array().unwrap();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0]["title"], "Accept offer");
    assert_eq!(decisions[0]["importance"], 4);
    assert_eq!(decisions[0]["date"], "2024-03-01");
    assert_eq!(decisions[0]["tags"][0], "career");
    assert_eq!(decisions[0]["reviews"], serde_json::json!([]));
}

#[test]
fn review_appends_to_existing_decision() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    let file = only_file_name(&store);
    decisionlog(&store)
        .args(["decide", &file, "--title", "Buy the house", "--importance", "5"])
        .assert()
        .success();

    let doc = show_json(&store, &file);
    let decision_id = doc["decisions"][0]["id"].as_str().unwrap().to_string();

    decisionlog(&store)
        .args([
            "review",
            &file,
            "--decision",
            &decision_id,
            "--outcome",
            "3",
            "--thesis",
            "2",
            "--luck",
            "1",
            "--notes",
            "rates dropped",
        ])
        .assert()
        .success();

    let doc = show_json(&store, &file);
    let review = &doc["decisions"][0]["reviews"][0];
    assert_eq!(review["outcomeRating"], 3);
    assert_eq!(review["thesisAccuracy"], 2);
    assert_eq!(review["luckRating"], 1);
    assert_eq!(review["notes"], "rates dropped");
}

#[test]
fn out_of_range_importance_is_rejected() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    let file = only_file_name(&store);

    decisionlog(&store)
        .args(["decide", &file, "--title", "Too big", "--importance", "6"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("importance"));

    let doc = show_json(&store, &file);
    assert_eq!(doc["decisions"].as_array().unwrap().len(), 0);
}

#[test]
fn remove_deletes_a_decision() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    let file = only_file_name(&store);
    decisionlog(&store)
        .args(["decide", &file, "--title", "Short lived"])
        .assert()
        .success();

    let doc = show_json(&store, &file);
    let decision_id = doc["decisions"][0]["id"].as_str().unwrap().to_string();

    decisionlog(&store)
        .args(["remove", &file, "--decision", &decision_id])
        .assert()
        .success()
        .stdout(predicates::str::contains("Removed decision"));

    let doc = show_json(&store, &file);
    assert_eq!(doc["decisions"].as_array().unwrap().len(), 0);
}

#[test]
fn export_import_round_trip() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["create", "--username", "jdoe"])
        .assert()
        .success();
    let file = only_file_name(&store);
    decisionlog(&store)
        .args(["decide", &file, "--title", "Sell the boat"])
        .assert()
        .success();

    let backup = scratch.path().join("backup.json");
    decisionlog(&store)
        .args(["export", &file])
        .arg(&backup)
        .assert()
        .success();
    let exported: Value = serde_json::from_slice(&fs::read(&backup).unwrap()).unwrap();
    assert_eq!(exported["decisions"][0]["title"], "Sell the boat");

    decisionlog(&store)
        .arg("import")
        .arg(&backup)
        .args(["--username", "other"])
        .assert()
        .success()
        .stdout(predicates::str::contains("decisionlog_other_"));

    decisionlog(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("decisionlog_other_"))
        .stdout(predicates::str::contains("decisionlog_jdoe_"));
}

#[test]
fn import_repairs_legacy_file() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let legacy = scratch.path().join("legacy.json");
    fs::write(
        &legacy,
        r#"{"decisions":[{"id":"d1","title":"Old","date":"2022-05-01"}]}"#,
    )
    .unwrap();

    decisionlog(&store)
        .arg("import")
        .arg(&legacy)
        .args(["--username", "jdoe"])
        .assert()
        .success()
        .stdout(predicates::str::contains("repairs applied"));

    let file = only_file_name(&store);
    let doc = show_json(&store, &file);
    assert_eq!(doc["decisions"][0]["reviews"], serde_json::json!([]));
}

#[test]
fn show_unknown_file_fails() {
    let store = TempDir::new().unwrap();
    decisionlog(&store)
        .args(["show", "decisionlog_nobody_20240101T000000Z.json"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no document file"));
}
