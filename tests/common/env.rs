//! Test environment builder for isolated Vigil testing.
//!
//! Provides `TestEnv` - an isolated project root with a results directory,
//! plus helpers to run the vigil CLI against it.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Result of running a vigil CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp project root.
pub struct TestEnv {
    /// Temporary directory acting as the working directory
    pub project_root: TempDir,
    vigil_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let project_root = TempDir::new().expect("create temp project root");
        std::fs::create_dir_all(project_root.path().join("results"))
            .expect("create results dir");
        Self {
            project_root,
            vigil_bin: PathBuf::from(env!("CARGO_BIN_EXE_vigil")),
        }
    }

    /// Path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.path("results")
    }

    /// Drop a result-record JSON into the results directory
    pub fn write_result(&self, file_name: &str, body: &str) {
        std::fs::write(self.results_dir().join(file_name), body).expect("write result file");
    }

    /// Write a vigil.toml in the project root
    pub fn write_config(&self, body: &str) {
        std::fs::write(self.path("vigil.toml"), body).expect("write config");
    }

    /// Run vigil from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run vigil from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from(self.project_root.path(), args, env_vars)
    }

    /// Run vigil from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.vigil_bin);
        cmd.current_dir(cwd)
            .args(args)
            // Deterministic plain-ASCII, uncolored output
            .env("VIGIL_NO_COLOR", "1")
            .env("TERM", "dumb");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute vigil");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
