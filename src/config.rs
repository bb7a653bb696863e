use crate::error::{SetupError, SetupResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Tool names, file names and preview limits used by the assistant.
///
/// Every field has a default so a config file only needs the keys it
/// overrides:
///
/// ```toml
/// python = "python3.12"
/// preview_limit = 20
/// preview_dirs = ["src", "lib", "app"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    pub git: String,
    pub node: String,
    pub npm: String,
    pub python: String,
    pub pip: String,
    pub pipenv: String,
    /// Virtual environment directory, relative to the working directory
    pub venv_dir: String,
    /// dotenv-style settings file, relative to the working directory
    pub settings_file: String,
    /// How many probed files are listed before cloning
    pub preview_limit: usize,
    /// Directory base names whose files show up in the post-clone preview
    pub preview_dirs: Vec<String>,
    /// Parent for the scratch clone (system temp dir when unset)
    pub scratch_root: Option<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            node: "node".to_string(),
            npm: "npm".to_string(),
            python: "python3".to_string(),
            pip: "pip".to_string(),
            pipenv: "pipenv".to_string(),
            venv_dir: "venv".to_string(),
            settings_file: ".env".to_string(),
            preview_limit: 10,
            preview_dirs: vec!["src".to_string(), "lib".to_string()],
            scratch_root: None,
        }
    }
}

impl SetupConfig {
    pub fn load(path: &Path) -> SetupResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SetupError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|reason| SetupError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> SetupResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
