//! Test configuration builder for writing main.toml into a temp dir

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    lines: Vec<String>,
    tags: Vec<String>,
    inventory: Vec<String>,
    write_file: bool,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            lines: Vec::new(),
            tags: Vec::new(),
            inventory: Vec::new(),
            write_file: true,
        }
    }

    pub fn worker_count(mut self, workers: usize) -> Self {
        self.lines.push(format!("worker_count = {}", workers));
        self
    }

    pub fn policy_inception(mut self, rfc3339: &str) -> Self {
        self.lines.push(format!("policy_inception = \"{}\"", rfc3339));
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.lines.push(format!("dry_run = {}", enabled));
        self
    }

    pub fn schedule(mut self, cron: &str) -> Self {
        self.lines.push(format!("schedule = \"{}\"", cron));
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push(format!("{} = \"{}\"", key, value));
        self
    }

    pub fn inventory(mut self, key: &str, value: &str) -> Self {
        self.inventory.push(format!("{} = \"{}\"", key, value));
        self
    }

    /// Leave the config dir empty
    pub fn without_file(mut self) -> Self {
        self.write_file = false;
        self
    }

    fn to_toml(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.tags.is_empty() {
            out.push_str("\n\n[tags]\n");
            out.push_str(&self.tags.join("\n"));
        }
        if !self.inventory.is_empty() {
            out.push_str("\n\n[inventory]\n");
            out.push_str(&self.inventory.join("\n"));
        }
        out.push('\n');
        out
    }

    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        if self.write_file {
            fs::write(config_dir.join("main.toml"), self.to_toml()).expect("Failed to write main.toml");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Written config; the temp dir lives as long as this value
pub struct TestConfig {
    _temp_dir: TempDir,
    config_dir: PathBuf,
}

impl TestConfig {
    pub fn config_dir_str(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }

    /// Overwrite main.toml with raw content
    pub fn write_raw(&self, content: &str) {
        fs::write(self.config_dir.join("main.toml"), content).expect("Failed to write main.toml");
    }
}
