//! Locating `policy.json`.
//!
//! An explicit `--policy` path always wins. Otherwise the first existing file
//! among the environment, user config and `/etc` candidates is used, and with
//! none of them present the built-in policy applies.

use std::path::{Path, PathBuf};

/// Where the policy came from, shown by `bias-audit check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    /// `BIAS_AUDIT_POLICY` or `BIAS_AUDIT_CONFIG_DIR`.
    Environment,
    XdgConfig,
    SystemConfig,
    #[default]
    BuiltinDefault,
}

impl ConfigSource {
    pub fn label(self) -> &'static str {
        match self {
            ConfigSource::CliArgument => "CLI argument",
            ConfigSource::Environment => "environment variable",
            ConfigSource::XdgConfig => "XDG config",
            ConfigSource::SystemConfig => "system config",
            ConfigSource::BuiltinDefault => "builtin default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved policy location. `path` is `None` for the built-in policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyPath {
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

pub const ENV_POLICY_PATH: &str = "BIAS_AUDIT_POLICY";
pub const ENV_CONFIG_DIR: &str = "BIAS_AUDIT_CONFIG_DIR";

const POLICY_FILENAME: &str = "policy.json";
const APP_NAME: &str = "bias-audit";

/// Find the policy file to load.
///
/// A CLI path is returned even when it does not exist, so loading reports the
/// bad path instead of quietly falling back to the defaults. The remaining
/// candidates are tried in order and skipped when absent:
/// `$BIAS_AUDIT_POLICY`, `$BIAS_AUDIT_CONFIG_DIR/policy.json`,
/// `~/.config/bias-audit/policy.json`, `/etc/bias-audit/policy.json`.
pub fn resolve_policy(cli_path: Option<&Path>) -> PolicyPath {
    if let Some(path) = cli_path {
        return PolicyPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    candidates()
        .into_iter()
        .find(|(path, _)| path.exists())
        .map(|(path, source)| PolicyPath {
            path: Some(path),
            source,
        })
        .unwrap_or_default()
}

fn candidates() -> Vec<(PathBuf, ConfigSource)> {
    let mut found = Vec::with_capacity(4);
    if let Ok(file) = std::env::var(ENV_POLICY_PATH) {
        found.push((PathBuf::from(file), ConfigSource::Environment));
    }
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        found.push((PathBuf::from(dir).join(POLICY_FILENAME), ConfigSource::Environment));
    }
    if let Some(dir) = xdg_config_dir() {
        found.push((dir.join(POLICY_FILENAME), ConfigSource::XdgConfig));
    }
    found.push((system_config_dir().join(POLICY_FILENAME), ConfigSource::SystemConfig));
    found
}

/// `~/.config/bias-audit` on Linux, or the platform equivalent.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

pub fn system_config_dir() -> PathBuf {
    Path::new("/etc").join(APP_NAME)
}
