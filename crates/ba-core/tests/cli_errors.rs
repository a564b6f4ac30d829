//! CLI error handling and policy commands.
//!
//! Bad inputs and bad policies must fail with a stable exit code and a
//! readable (or, with `--format json`, structured) error on stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bias_audit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bias-audit").expect("bias-audit binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("BIAS_AUDIT_POLICY")
        .env("BIAS_AUDIT_CONFIG_DIR", dir.path())
        .env("XDG_CONFIG_HOME", dir.path());
    cmd
}

mod data_errors {
    use super::*;

    #[test]
    fn missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .args(["audit", "does-not-exist.csv"])
            .assert()
            .code(21)
            .stderr(predicate::str::contains("Fix:"));
    }

    #[test]
    fn default_input_missing() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir).assert().code(21);
    }

    #[test]
    fn missing_columns_are_listed() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("audit")
            .arg(fixture("missing_columns.csv"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("is_recid"))
            .stderr(predicate::str::contains("score_text"));
    }

    #[test]
    fn malformed_row_reports_line() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("audit")
            .arg(fixture("malformed.csv"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("line 3"))
            .stderr(predicate::str::contains("decile_score"));
    }

    #[test]
    fn structured_error_in_json_mode() {
        let dir = TempDir::new().unwrap();
        let output = bias_audit(&dir)
            .env("BA_LOG", "off")
            .args(["--format", "json", "audit"])
            .arg(fixture("missing_columns.csv"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(11));
        assert!(output.stdout.is_empty());
        let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
        assert_eq!(json["code"], 21);
        assert_eq!(json["category"], "data");
        assert!(json["context"]["columns"].as_array().unwrap().len() >= 3);
    }
}

mod policy_errors {
    use super::*;

    #[test]
    fn unparseable_policy_is_config_error() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("--policy")
            .arg(fixture("bad_policy.json"))
            .arg("audit")
            .arg(fixture("compas_sample.csv"))
            .assert()
            .code(12)
            .stderr(predicate::str::contains("invalid policy file"));
    }

    #[test]
    fn out_of_range_policy_value() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("--policy")
            .arg(fixture("invalid_threshold_policy.json"))
            .arg("check")
            .assert()
            .code(12)
            .stderr(predicate::str::contains("high_risk_threshold"));
    }

    #[test]
    fn explicit_missing_policy_is_not_ignored() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .args(["--policy", "nope.json", "check"])
            .assert()
            .code(12);
    }

    #[test]
    fn policy_env_var() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .env("BIAS_AUDIT_POLICY", fixture("bad_policy.json"))
            .arg("check")
            .assert()
            .code(12);
    }
}

mod arguments {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_format_fails() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .args(["--format", "yaml", "check"])
            .assert()
            .code(10);
    }

    #[test]
    fn help_succeeds() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .args(["audit", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--no-chart"))
            .stdout(predicate::str::contains("--strict"));
    }
}

mod policy_commands {
    use super::*;

    #[test]
    fn check_reports_builtin_default() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("policy: ok"))
            .stdout(predicate::str::contains("Source: builtin default"));
    }

    #[test]
    fn check_reports_cli_path_as_json() {
        let dir = TempDir::new().unwrap();
        let output = bias_audit(&dir)
            .args(["--format", "json", "--policy"])
            .arg(fixture("strict_policy.json"))
            .arg("check")
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["policy"]["source"], "CLI argument");
        assert!(json["policy"]["path"]
            .as_str()
            .unwrap()
            .ends_with("strict_policy.json"));
    }

    #[test]
    fn config_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let output = bias_audit(&dir).args(["config", "default"]).output().unwrap();
        assert!(output.status.success());
        let policy = ba_config::AuditPolicy::parse_json(&String::from_utf8(output.stdout).unwrap())
            .unwrap();
        assert_eq!(policy, ba_config::AuditPolicy::default());
    }

    #[test]
    fn config_show_reflects_policy_file() {
        let dir = TempDir::new().unwrap();
        bias_audit(&dir)
            .arg("--policy")
            .arg(fixture("strict_policy.json"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"screening_window_days\": 10"))
            .stdout(predicate::str::contains("\"title\": \"Sample Audit\""));
    }
}
