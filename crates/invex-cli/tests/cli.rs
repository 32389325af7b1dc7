//! Command line tests against a throwaway workspace.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DB: &str = r#"{
  "invoices": [
    {
      "invoice_id": "2f1c7c1e-8a55-4b1d-9d83-3f0f2a6e1a01",
      "invoice_no": "17042",
      "vendor": "John Smith",
      "date": "03/05/2024",
      "total_amount": 123.45,
      "items": [
        { "name": "Gaming Laptop", "price": 100.0, "category": "technology" },
        { "name": "Face Mask", "price": 23.45, "category": "fashion" }
      ],
      "content_fingerprint": "aa11"
    },
    {
      "invoice_id": "6b0d4c52-3f1e-4c8e-a5e4-8b2d7c9f0b02",
      "invoice_no": "51109338",
      "vendor": "Andrews, Kirby and Valdez",
      "date": "04/13/2013",
      "total_amount": 57.18,
      "items": [
        { "name": "Table Lamp", "price": 57.18, "category": "home essentials" }
      ],
      "_hash": "bb22"
    }
  ]
}"#;

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Write a config pointing every directory into the workspace.
    fn write_config(&self) -> PathBuf {
        let config = serde_json::json!({
            "directories": {
                "incoming": self.path("incoming"),
                "processed": self.path("processed"),
                "failed": self.path("failed"),
            },
            "store": { "backend": "json", "path": self.path("invoices_db.json") },
            "ocr": { "model_dir": self.path("models") },
            "notify": { "enabled": false },
        });
        let path = self.path("config.json");
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        path
    }

    fn seed_store(&self) {
        fs::write(self.path("invoices_db.json"), DB).unwrap();
    }

    fn invex(&self, config: &Path) -> Command {
        let mut cmd = Command::cargo_bin("invex").unwrap();
        cmd.arg("--config").arg(config);
        cmd
    }
}

#[test]
fn test_report_text() {
    let ws = Workspace::new();
    let config = ws.write_config();
    ws.seed_store();

    ws.invex(&config)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoices:        2"))
        .stdout(predicate::str::contains("Revenue by vendor"))
        .stdout(predicate::str::contains("Andrews, Kirby and Valdez"))
        .stdout(predicate::str::contains("home essentials"));
}

#[test]
fn test_report_json() {
    let ws = Workspace::new();
    let config = ws.write_config();
    ws.seed_store();

    let output = ws
        .invex(&config)
        .args(["report", "--format", "json", "--top", "1", "--year", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_invoices"], 2);
    assert_eq!(report["revenue_by_vendor"].as_array().unwrap().len(), 1);
    assert_eq!(report["revenue_by_vendor"][0]["label"], "John Smith");
    assert_eq!(report["top_invoices"][0]["invoice_no"], "17042");
    assert_eq!(report["monthly_revenue"]["year"], 2024);
}

#[test]
fn test_report_on_empty_store() {
    let ws = Workspace::new();
    let config = ws.write_config();

    ws.invex(&config)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No invoices stored yet"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let ws = Workspace::new();

    ws.invex(&ws.path("nope.json"))
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_init_then_get_and_set() {
    let ws = Workspace::new();
    let config = ws.path("conf/invex.json");

    ws.invex(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    ws.invex(&config).args(["config", "init"]).assert().success();
    assert!(config.exists());

    ws.invex(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ws.invex(&config)
        .args(["config", "set", "watch.poll_interval_ms", "250"])
        .assert()
        .success();

    ws.invex(&config)
        .args(["config", "get", "watch.poll_interval_ms"])
        .assert()
        .success()
        .stdout(predicate::str::diff("250\n"));

    ws.invex(&config)
        .args(["config", "get", "watch.bogus"])
        .assert()
        .failure();
}

#[test]
fn test_watch_once_moves_unreadable_file_to_failed() {
    let ws = Workspace::new();
    let config = ws.write_config();
    fs::create_dir_all(ws.path("incoming")).unwrap();
    fs::write(ws.path("incoming/broken.pdf"), b"not a pdf at all").unwrap();

    ws.invex(&config)
        .args(["watch", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 stored, 0 duplicates, 1 failed"))
        .stdout(predicate::str::contains("broken.pdf"));

    assert!(!ws.path("incoming/broken.pdf").exists());
    assert!(ws.path("failed/broken.pdf").exists());
    assert!(!ws.path("invoices_db.json").exists());
}

#[test]
fn test_watch_once_with_empty_incoming() {
    let ws = Workspace::new();
    let config = ws.write_config();

    ws.invex(&config)
        .args(["watch", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files waiting"));
}
