use crate::error::{SetupError, SetupResult};
use log::debug;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How the child's stdout/stderr are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect output so it can be reported or discarded
    Captured,
    /// Stream straight to the user's terminal
    Inherited,
}

/// A program invocation, described independently of how it is run
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
    pub output: OutputMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            output: OutputMode::Inherited,
        }
    }

    /// Run `line` through the platform shell
    pub fn shell(line: &str) -> Self {
        if cfg!(windows) {
            Self::new("cmd").args(["/C", line])
        } else {
            Self::new("sh").args(["-c", line])
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn envs<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        self.envs.extend(vars.into_iter().cloned());
        self
    }

    pub fn captured(mut self) -> Self {
        self.output = OutputMode::Captured;
        self
    }

    /// True when the program name or any argument equals `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.program == needle || self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What a finished child process left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// Turn an unsuccessful outcome into an error for steps where failure is fatal
    pub fn check(self, spec: &CommandSpec) -> SetupResult<Self> {
        if self.success {
            return Ok(self);
        }
        Err(SetupError::CommandFailed {
            command: spec.to_string(),
            status: self.status_text(),
            stderr: self.stderr,
        })
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Every external process the assistant starts goes through this seam.
///
/// Only a failure to spawn is an `Err`; a non-zero exit is reported in the
/// returned [`CommandOutcome`] and the caller decides whether it matters.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> SetupResult<CommandOutcome>;
}

/// Runs commands with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> SetupResult<CommandOutcome> {
        debug!(
            "running `{}` in {}",
            spec,
            spec.cwd
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        for (key, value) in &spec.envs {
            cmd.env(key, value);
        }

        let spawn_err = |source: std::io::Error| SetupError::Spawn {
            program: spec.program.clone(),
            source,
        };

        let outcome = match spec.output {
            OutputMode::Captured => {
                let output = cmd
                    .stdin(Stdio::null())
                    .output()
                    .map_err(spawn_err)?;
                CommandOutcome {
                    success: output.status.success(),
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
            OutputMode::Inherited => {
                let status = cmd.status().map_err(spawn_err)?;
                CommandOutcome {
                    success: status.success(),
                    code: status.code(),
                    ..Default::default()
                }
            }
        };

        debug!("`{}` finished: {}", spec.program, outcome.status_text());
        Ok(outcome)
    }
}
