#![allow(dead_code)]

use devsetup::process::{CommandOutcome, CommandRunner, CommandSpec, SystemRunner, ToolLocator};
use devsetup::SetupResult;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Runs real `git`, fakes everything else and records every command.
/// `python -m venv <dir>` is simulated by creating the directory.
#[derive(Default)]
pub struct HybridRunner {
    pub specs: RefCell<Vec<CommandSpec>>,
    /// Programs or arguments whose commands should fail
    pub failing: Vec<String>,
}

impl HybridRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(needles: &[&str]) -> Self {
        Self {
            failing: needles.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.specs.borrow().iter().map(|s| s.to_string()).collect()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.specs.borrow().iter().any(|s| s.mentions(needle))
    }
}

impl CommandRunner for HybridRunner {
    fn run(&self, spec: &CommandSpec) -> SetupResult<CommandOutcome> {
        self.specs.borrow_mut().push(spec.clone());

        if self.failing.iter().any(|needle| spec.mentions(needle)) {
            return Ok(CommandOutcome::failed(1, "simulated failure"));
        }

        if spec.program == "git" {
            return SystemRunner.run(spec);
        }

        if spec.mentions("venv") && spec.mentions("-m") {
            let cwd = spec.cwd.clone().unwrap_or_else(|| PathBuf::from("."));
            if let Some(dir) = spec.args.last() {
                fs::create_dir_all(cwd.join(dir))?;
            }
        }

        Ok(CommandOutcome::ok())
    }
}

/// Pretends exactly the listed tools are installed
pub struct FakeLocator(pub HashSet<String>);

impl FakeLocator {
    pub fn with(tools: &[&str]) -> Self {
        Self(tools.iter().map(|s| s.to_string()).collect())
    }
}

impl ToolLocator for FakeLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.0.contains(name).then(|| PathBuf::from("/usr/bin").join(name))
    }
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.email=test@test.com", "-c", "user.name=Test"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {:?} failed", args);
}

/// An empty bare repository
pub fn empty_remote() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "--bare", "-q"]);
    dir
}

/// A repository with one commit containing `files`
pub fn remote_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "Initial commit"]);
    dir
}

pub fn url_of(dir: &TempDir) -> String {
    dir.path().display().to_string()
}
