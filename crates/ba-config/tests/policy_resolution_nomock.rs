//! No-mock policy validation + resolution tests.
//!
//! Covers:
//! - Policy validation against real JSON fixtures
//! - Resolution order (CLI > env file > env config dir > defaults)

use ba_config::resolve::{resolve_policy, ConfigSource, ENV_CONFIG_DIR, ENV_POLICY_PATH};
use ba_config::validate::{validate_policy, ValidationError};
use ba_config::AuditPolicy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_policy_fixture(name: &str) -> AuditPolicy {
    AuditPolicy::from_file(&fixtures_dir().join(name)).expect("read policy fixture")
}

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let saved = keys.iter().map(|k| env::var(k).ok()).collect();
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_policy(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir).expect("create config dir");
    let dest = dir.join("policy.json");
    fs::copy(fixtures_dir().join("valid_policy.json"), &dest).expect("copy fixture");
    dest
}

#[test]
fn test_valid_fixture_passes() {
    let policy = load_policy_fixture("valid_policy.json");
    validate_policy(&policy).expect("valid policy should pass validation");
    assert_eq!(policy.high_risk_threshold, 7);
    assert_eq!(policy.columns.group, "sex");
    assert_eq!(policy.columns.decile_score, "decile_score");
    assert_eq!(policy.comparison.reference, "Female");
}

#[test]
fn test_bad_threshold_fixture_rejected() {
    let policy = load_policy_fixture("invalid_policy_bad_threshold.json");
    let err = validate_policy(&policy).expect_err("threshold 12 should fail");
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_unknown_reference_fixture_rejected() {
    let policy = load_policy_fixture("invalid_policy_unknown_reference.json");
    let err = validate_policy(&policy).expect_err("unknown reference should fail");
    assert!(err.to_string().contains("comparison.reference"));
}

#[test]
fn test_resolve_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_POLICY_PATH, ENV_CONFIG_DIR]);
        let temp = TempDir::new().expect("temp dir");
        let cli = write_policy(&temp.path().join("cli"));
        let from_env = write_policy(&temp.path().join("env"));
        env::set_var(ENV_POLICY_PATH, from_env.display().to_string());

        let resolved = resolve_policy(Some(&cli));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path, Some(cli));
    });
}

#[test]
fn test_resolve_env_file_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_POLICY_PATH, ENV_CONFIG_DIR]);
        let temp = TempDir::new().expect("temp dir");
        let file = write_policy(&temp.path().join("file"));
        let dir = temp.path().join("dir");
        write_policy(&dir);
        env::set_var(ENV_POLICY_PATH, file.display().to_string());
        env::set_var(ENV_CONFIG_DIR, dir.display().to_string());

        let resolved = resolve_policy(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path, Some(file));
    });
}

#[test]
fn test_resolve_config_dir_when_env_file_missing() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_POLICY_PATH, ENV_CONFIG_DIR]);
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("dir");
        let in_dir = write_policy(&dir);
        env::set_var(
            ENV_POLICY_PATH,
            temp.path().join("missing.json").display().to_string(),
        );
        env::set_var(ENV_CONFIG_DIR, dir.display().to_string());

        let resolved = resolve_policy(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path, Some(in_dir));
    });
}
