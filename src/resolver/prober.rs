use crate::error::{SetupError, SetupResult};
use crate::process::{CommandRunner, CommandSpec};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// What a throwaway shallow clone revealed about a repository
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Final path segment of the scratch directory
    pub name: String,
    /// Every regular file, relative to the clone root, in walk order
    pub files: Vec<PathBuf>,
    /// Where the scratch clone lived; already removed when the report is returned
    pub scratch_dir: PathBuf,
}

impl ProbeReport {
    pub fn preview(&self, limit: usize) -> &[PathBuf] {
        &self.files[..self.files.len().min(limit)]
    }
}

pub struct RepositoryProber<'a> {
    runner: &'a dyn CommandRunner,
    git: &'a str,
    scratch_root: Option<&'a Path>,
}

impl<'a> RepositoryProber<'a> {
    pub fn new(runner: &'a dyn CommandRunner, git: &'a str) -> Self {
        Self {
            runner,
            git,
            scratch_root: None,
        }
    }

    /// Create scratch clones under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: Option<&'a Path>) -> Self {
        self.scratch_root = root;
        self
    }

    /// Shallow-clone `url` into a scratch directory, list it, then drop it.
    ///
    /// The `TempDir` guard removes the directory on every return path.
    pub fn probe(&self, url: &str) -> SetupResult<ProbeReport> {
        let scratch = match self.scratch_root {
            Some(root) => TempDir::new_in(root)?,
            None => TempDir::new()?,
        };
        let scratch_dir = scratch.path().to_path_buf();
        debug!("probing {} in {}", url, scratch_dir.display());

        let spec = CommandSpec::new(self.git)
            .args(["clone", "--depth", "1", url])
            .arg(scratch.path());
        let outcome = self.runner.run(&spec)?;
        if !outcome.success {
            return Err(SetupError::Probe {
                url: url.to_string(),
                reason: format!("shallow clone failed ({})", outcome.status_text()),
            });
        }

        let name = scratch_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let files = list_files(scratch.path())?;

        scratch.close()?;

        Ok(ProbeReport {
            name,
            files,
            scratch_dir,
        })
    }
}

/// Regular files under `root`, relative to it
pub fn list_files(root: &Path) -> SetupResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|e| SetupError::Io(e.into()))?;
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }
    Ok(files)
}
