//! Shared helpers for CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory the binary runs in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn hoist(&self) -> Cli {
        let mut cli = hoist();
        cli.cmd.current_dir(self.path());
        cli
    }
}

/// Invoke the binary outside any project directory
pub fn hoist() -> Cli {
    let mut cmd = Command::cargo_bin("hoist").unwrap();
    cmd.env_remove("RUST_LOG");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and expect exit code 0
    pub fn passes(mut self) -> Outcome {
        Outcome(self.cmd.assert().success())
    }

    /// Run and expect a non-zero exit code
    pub fn fails(mut self) -> Outcome {
        Outcome(self.cmd.assert().failure())
    }
}

pub struct Outcome(Assert);

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        Outcome(self.0.stdout(predicate::str::contains(needle)))
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Outcome(self.0.stdout(predicate::str::contains(needle).not()))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Outcome(self.0.stderr(predicate::str::contains(needle)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
