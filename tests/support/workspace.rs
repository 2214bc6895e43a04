use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway shop: config file plus local storage directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Signed-in workspace running on local storage.
    pub fn new() -> Self {
        Self::with_session("[session]\nuser_id = \"shop-1\"\n")
    }

    /// Workspace without a signed-in user.
    pub fn signed_out() -> Self {
        Self::with_session("")
    }

    fn with_session(session: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let local = dir.path().join("local");
        let config = format!(
            "[local]\npath = {:?}\n\n{session}",
            local.display().to_string()
        );
        fs::write(dir.path().join("config.toml"), config).expect("write config");
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn local_dir(&self) -> PathBuf {
        self.dir.path().join("local")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `tirestock` run from the workspace with a clean environment.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("tirestock");
        cmd.current_dir(self.dir.path())
            .env_remove("SUPABASE_URL")
            .env_remove("SUPABASE_ANON_KEY")
            .env_remove("TIRESTOCK_ACCESS_TOKEN")
            .env_remove("RUST_LOG")
            .args(["--color", "never"]);
        cmd
    }

    /// `tirestock --config <workspace config>`.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }

    /// Run a `--json` command and return the object carrying `command`.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run tirestock");
        assert!(
            output.status.success(),
            "command {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        command_payload(&String::from_utf8_lossy(&output.stdout))
    }

    /// Add a tire and return its id.
    pub fn add_tire(&self, brand: &str, price: &str, stock: &str) -> String {
        let value = self.json(&[
            "tire",
            "add",
            "--measure",
            "120/70-17",
            "--brand",
            brand,
            "--reference",
            "Road 6",
            "--category",
            "sport",
            "--type",
            "front",
            "--price",
            price,
            "--stock",
            stock,
        ]);
        value["tire"]["id"]
            .as_str()
            .expect("tire id in output")
            .to_string()
    }
}

/// Pick the command result out of JSON-lines output.
pub fn command_payload(stdout: &str) -> serde_json::Value {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|value| value.get("command").is_some())
        .unwrap_or_else(|| panic!("no command payload in output:\n{stdout}"))
}
