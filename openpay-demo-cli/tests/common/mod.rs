//! Common test utilities for openpay-demo-cli integration tests

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test context with a temporary directory file and config path
#[allow(dead_code)]
pub struct TestContext {
    pub temp_dir: TempDir,
    pub directory_file: PathBuf,
    pub config_file: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let directory_file = temp_dir.path().join("data").join("wallets.json");
        let config_file = temp_dir.path().join("openpay.json");
        Self {
            temp_dir,
            directory_file,
            config_file,
        }
    }

    /// Build a command for the `openpay` binary bound to this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_openpay"));
        cmd.env("OPENPAY_DIRECTORY", &self.directory_file)
            .env("OPENPAY_CONFIG", &self.config_file)
            .env_remove("OPENPAY_COUNTERPART_URL")
            .env_remove("RUST_LOG")
            .current_dir(self.temp_dir.path());
        cmd
    }

    /// Run the binary with `args` and capture its output
    pub fn run(&self, args: &[&str]) -> CliOutput {
        let output = self.command().args(args).output().unwrap();
        CliOutput::from(output)
    }
}

/// Captured process output
#[allow(dead_code)]
pub struct CliOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for CliOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
