//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Smallest valid day, kept short so full runs stay quick
pub const SHORT_DAY: &[&str] = &["-t", "10", "-n", "5", "--seed", "7"];

/// Scratch directory a run writes its logs and report into
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Write a file relative to the scratch root
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// `lift` with its log directory pointed at this scratch dir
    pub fn lift(&self) -> Lift {
        let mut cmd = Command::cargo_bin("lift").unwrap();
        cmd.current_dir(self.path())
            .arg("--log-dir")
            .arg(self.log_dir())
            .env("RUST_LOG", "info");
        Lift { cmd }
    }
}

pub struct Lift {
    cmd: Command,
}

impl Lift {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Outcome {
        Outcome(self.cmd.assert().failure().code(1))
    }

    /// Rejected by the argument parser itself
    pub fn fails_with_usage(mut self) -> Outcome {
        Outcome(self.cmd.assert().failure().code(2))
    }
}

pub struct Outcome(Assert);

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        Outcome(self.0.stdout(predicate::str::contains(needle)))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Outcome(self.0.stderr(predicate::str::contains(needle)))
    }
}
