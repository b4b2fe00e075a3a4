//! Common test utilities shared across integration tests.
//!
//! Clippy cannot track usage across integration test files,
//! hence the `allow(dead_code)` annotation.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PASSWORD: &str = "s3cret";

pub struct TestFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("logstitch").join("config.toml");

        Self {
            temp_dir,
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join("events.csv")
    }

    pub fn write_config(&self, content: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    pub fn read_output(&self) -> anyhow::Result<String> {
        Ok(fs::read_to_string(self.output_path())?)
    }

    /// `logstitch` isolated from the caller's config and credentials.
    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("logstitch");
        cmd.env("LOGSTITCH_CONFIG", &self.config_path)
            .env_remove("LOGSTITCH_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `logstitch export` against `controller_url`, writing to `output_path()`.
    pub fn export(&self, controller_url: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("export")
            .arg("--controller")
            .arg(controller_url)
            .arg("--output")
            .arg(self.output_path())
            .env("LOGSTITCH_PASSWORD", PASSWORD);
        cmd
    }
}
