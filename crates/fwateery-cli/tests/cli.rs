use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Workspace with a config pointing the store into the temp dir.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new(language: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let data_dir = dir.path().join("data");
        fs::write(
            &config,
            serde_json::json!({
                "general": { "language": language, "user": "clinic" },
                "store": { "data_dir": data_dir },
            })
            .to_string(),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fwateery").unwrap();
        cmd.arg("-c").arg(&self.config);
        cmd
    }

    /// Write an image and the saved model response beside it.
    fn add_image(&self, stem: &str, response: &str) {
        fs::write(self.path().join(format!("{stem}.png")), b"\x89PNG fake").unwrap();
        fs::write(self.path().join(format!("{stem}.json")), response).unwrap();
    }

    fn store_file(&self) -> PathBuf {
        self.path().join("data").join("fwateery_data_clinic.json")
    }

    fn listed(&self) -> Vec<serde_json::Value> {
        let output = self.cmd().args(["list", "--json"]).output().unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn glob(&self) -> String {
        format!("{}/*.png", self.path().display())
    }
}

#[test]
fn test_scan_normalizes_and_stores() {
    let ws = Workspace::new("en");
    ws.add_image(
        "visit",
        r#"```json
[
  {"patientName": "Ahmed Ali", "procedure": "X-Ray", "price": "45000", "date": "2024-01-06"},
  {"patientName": "Ahmed Ali", "procedure": "Consultation", "price": 999, "date": "2024-01-06"}
]
```"#,
    );

    ws.cmd()
        .args(["scan", &ws.glob()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded, 0 failed"));

    assert!(ws.store_file().exists());

    let records = ws.listed();
    assert_eq!(records.len(), 2);
    let price_of = |procedure: &str| {
        records
            .iter()
            .find(|r| r["procedure"] == procedure)
            .map(|r| r["price"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(price_of("X-Ray"), "450");
    assert_eq!(price_of("Consultation"), "130");
    assert!(records.iter().all(|r| r["dayName"] == "Saturday"));
    assert!(records.iter().all(|r| r.get("originalImage").is_none()));
}

#[test]
fn test_scan_continues_past_failed_image() {
    let ws = Workspace::new("en");
    ws.add_image("a", r#"{"patientName": "A", "procedure": "Scan", "price": "200", "date": "2024-03-01"}"#);
    ws.add_image("b", "this is not json");
    ws.add_image("c", r#"{"patientName": "C", "procedure": "Scan", "price": "15000", "date": "2024-03-02"}"#);

    ws.cmd()
        .args(["scan", &ws.glob()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 1 failed"))
        .stdout(predicate::str::contains("b.png"));

    assert_eq!(ws.listed().len(), 2);
}

#[test]
fn test_scan_without_matches_fails() {
    let ws = Workspace::new("en");

    ws.cmd()
        .args(["scan", &ws.glob()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching images"));
}

#[test]
fn test_scan_refuses_corrupt_store() {
    let ws = Workspace::new("en");
    ws.add_image("visit", r#"{"patientName": "A", "procedure": "Scan", "price": "200"}"#);
    fs::create_dir_all(ws.store_file().parent().unwrap()).unwrap();
    fs::write(ws.store_file(), "{broken").unwrap();

    ws.cmd().args(["scan", &ws.glob()]).assert().failure();

    assert_eq!(fs::read_to_string(ws.store_file()).unwrap(), "{broken");
}

#[test]
fn test_edit_show_and_delete() {
    let ws = Workspace::new("en");
    ws.add_image(
        "visit",
        r#"{"patientName": "Mona", "procedure": "Blood test", "price": "300", "date": "2024-01-06"}"#,
    );
    ws.cmd().args(["scan", &ws.glob()]).assert().success();

    let id = ws.listed()[0]["id"].as_str().unwrap().to_string();

    ws.cmd()
        .args(["edit", &id, "--price", "350", "--date", "2024-01-08"])
        .assert()
        .success();

    ws.cmd()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Price: 350 EGP"))
        .stdout(predicate::str::contains("Date: 2024-01-08 (Monday)"));

    ws.cmd()
        .args(["edit", &id, "--date", "08/01/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));

    ws.cmd().args(["delete", &id]).assert().success();
    assert!(ws.listed().is_empty());

    ws.cmd()
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invoice not found"));
}

#[test]
fn test_arabic_placeholders() {
    let ws = Workspace::new("ar");
    ws.add_image("visit", r#"{"procedure": "كشف عيادة", "price": "500", "date": "2024-03-05"}"#);
    ws.cmd().args(["scan", &ws.glob()]).assert().success();

    let records = ws.listed();
    assert_eq!(records[0]["patientName"], "غير متوفر");
    assert_eq!(records[0]["price"], "130");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("مارس ٢٠٢٤"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config_arg = config.to_str().unwrap();

    Command::cargo_bin("fwateery")
        .unwrap()
        .args(["config", "init", "-c", config_arg])
        .assert()
        .success();
    assert!(config.exists());

    Command::cargo_bin("fwateery")
        .unwrap()
        .args(["config", "set", "general.language", "en", "-c", config_arg])
        .assert()
        .success();

    Command::cargo_bin("fwateery")
        .unwrap()
        .args(["config", "get", "general.language", "-c", config_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"en\""));

    Command::cargo_bin("fwateery")
        .unwrap()
        .args(["config", "set", "general.language", "fr", "-c", config_arg])
        .assert()
        .failure();

    Command::cargo_bin("fwateery")
        .unwrap()
        .args(["config", "init", "-c", config_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
