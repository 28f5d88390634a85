//! Configuration for Vigil
//!
//! Loaded from `vigil.toml` in the working directory. Unknown keys are
//! surfaced as non-fatal warnings, a missing file falls back to defaults,
//! and a few settings can be overridden from the environment (`VIGIL_*`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{VigilError, VigilResult};
use crate::report::GradeThresholds;
use crate::store::DEFAULT_MYSQL_MARKER;

/// Default config file name
pub const CONFIG_FILE: &str = "vigil.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())
    }
}

/// Remediation collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationConfig {
    /// Playbook runner executable (override for venv installs)
    #[serde(default = "default_command")]
    pub command: PathBuf,

    /// Ansible inventory file
    #[serde(default = "default_inventory")]
    pub inventory: PathBuf,

    /// Playbook that applies a fix for one check
    #[serde(default = "default_fix_playbook")]
    pub fix_playbook: PathBuf,

    /// Playbook that (re-)audits checks and rewrites result files
    #[serde(default = "default_audit_playbook")]
    pub audit_playbook: PathBuf,

    /// Uniform subprocess time budget in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            inventory: default_inventory(),
            fix_playbook: default_fix_playbook(),
            audit_playbook: default_audit_playbook(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_command() -> PathBuf {
    PathBuf::from("ansible-playbook")
}

fn default_inventory() -> PathBuf {
    PathBuf::from("hosts")
}

fn default_fix_playbook() -> PathBuf {
    PathBuf::from("run_fix.yml")
}

fn default_audit_playbook() -> PathBuf {
    PathBuf::from("run_audit.yml")
}

fn default_timeout_secs() -> u64 {
    60
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the audit playbooks write result JSON files into
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Targets always offered for selection, even before any results exist
    #[serde(default = "default_base_targets")]
    pub base_targets: Vec<String>,

    /// Target-name substring identifying MySQL hosts when classifying
    /// database checks
    #[serde(default = "default_mysql_marker")]
    pub mysql_marker: String,

    #[serde(default)]
    pub grades: GradeThresholds,

    #[serde(default)]
    pub remediation: RemediationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            base_targets: default_base_targets(),
            mysql_marker: default_mysql_marker(),
            grades: GradeThresholds::default(),
            remediation: RemediationConfig::default(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_base_targets() -> Vec<String> {
    vec!["Rocky9".to_string(), "Rocky10".to_string()]
}

fn default_mysql_marker() -> String {
    DEFAULT_MYSQL_MARKER.to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> VigilResult<Self> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys).
    pub fn load_with_warnings(path: &Path) -> VigilResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Config = serde_ignored::deserialize(deserializer, |p| {
            unknown_paths.push(p.to_string());
        })
        .map_err(|e| VigilError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| ConfigWarning {
                key: path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string(),
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load `vigil.toml` from `dir`, falling back to defaults if the file is
    /// missing or unreadable, then apply environment overrides.
    pub fn load_or_default(dir: &Path) -> (Self, Vec<ConfigWarning>) {
        let path = dir.join(CONFIG_FILE);
        let (config, warnings) = if path.exists() {
            Self::load_with_warnings(&path).unwrap_or_else(|_| (Self::default(), Vec::new()))
        } else {
            (Self::default(), Vec::new())
        };
        (config.with_env_overrides(), warnings)
    }

    /// Apply environment variable overrides (VIGIL_* prefix).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("VIGIL_RESULTS_DIR") {
            if !dir.is_empty() {
                self.results_dir = PathBuf::from(dir);
            }
        }
        if let Ok(secs) = std::env::var("VIGIL_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.remediation.timeout_secs = secs;
            }
        }
        self
    }

    /// Results directory with `~` expanded.
    pub fn results_dir(&self) -> PathBuf {
        expand_home(&self.results_dir)
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if s == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}
