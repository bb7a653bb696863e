use std::path::PathBuf;
use thiserror::Error;

/// Result type for setup operations
pub type SetupResult<T> = Result<T, SetupError>;

/// Errors raised by the setup steps
#[derive(Debug, Error)]
pub enum SetupError {
    /// The program could not be started at all
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("`{command}` failed ({status}){}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The shallow clone used for the repository preview failed
    #[error("could not inspect repository {url}: {reason}")]
    Probe { url: String, reason: String },

    /// Settings file exists but could not be parsed
    #[error("invalid settings file {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Reading the prompt answer failed
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Configuration file could not be loaded
    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl From<dialoguer::Error> for SetupError {
    fn from(err: dialoguer::Error) -> Self {
        SetupError::Prompt(err.to_string())
    }
}
