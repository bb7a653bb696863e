use crate::process::{CommandRunner, CommandSpec};
use crate::ui::{spinner, theme};
use log::{debug, warn};

pub const INVALID_URL_MESSAGE: &str = "URL no válido o no se pudo conectar al repositorio.";

/// Checks that a remote answers `git ls-remote`.
///
/// This is a reachability check, not a syntax check: one attempt, output
/// suppressed, any failure means invalid.
pub struct UrlValidator<'a> {
    runner: &'a dyn CommandRunner,
    git: &'a str,
}

impl<'a> UrlValidator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, git: &'a str) -> Self {
        Self { runner, git }
    }

    pub fn validate(&self, url: &str) -> bool {
        if url.trim().is_empty() {
            println!("{}", theme::error(INVALID_URL_MESSAGE));
            return false;
        }

        let spec = CommandSpec::new(self.git)
            .args(["ls-remote", url])
            .captured();

        let progress = spinner("Verificando el repositorio...");
        let result = self.runner.run(&spec);
        progress.finish_and_clear();

        match result {
            Ok(outcome) if outcome.success => {
                debug!("{} answered ls-remote", url);
                true
            }
            Ok(outcome) => {
                debug!("ls-remote {} failed: {}", url, outcome.stderr.trim());
                println!("{}", theme::error(INVALID_URL_MESSAGE));
                false
            }
            Err(e) => {
                warn!("{}", e);
                println!("{}", theme::error(INVALID_URL_MESSAGE));
                false
            }
        }
    }
}
