use super::destination::ensure_dir;
use crate::error::{SetupError, SetupResult};
use crate::process::{CommandRunner, CommandSpec};
use crate::ui::{spinner, theme};
use log::info;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CLONE_FAILED_MESSAGE: &str = "Error al clonar el repositorio:";

/// Performs the persistent clone and prints a short file preview
pub struct Cloner<'a> {
    runner: &'a dyn CommandRunner,
    git: &'a str,
    preview_dirs: &'a [String],
}

impl<'a> Cloner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, git: &'a str, preview_dirs: &'a [String]) -> Self {
        Self {
            runner,
            git,
            preview_dirs,
        }
    }

    /// Clone `url` into `destination`, returning the previewed files.
    ///
    /// A failed clone prints git's stderr and comes back as an error.
    pub fn clone_repository(&self, url: &str, destination: &Path) -> SetupResult<Vec<PathBuf>> {
        ensure_dir(destination)?;

        let spec = CommandSpec::new(self.git)
            .args(["clone", url])
            .arg(destination)
            .captured();

        let progress = spinner("Clonando el repositorio...");
        let result = self.runner.run(&spec);
        progress.finish_and_clear();

        if let Err(e) = result.and_then(|outcome| outcome.check(&spec)) {
            let details = match &e {
                SetupError::CommandFailed { stderr, .. } => stderr.trim().to_string(),
                other => other.to_string(),
            };
            println!("{} {}", theme::error(CLONE_FAILED_MESSAGE), details);
            return Err(e);
        }

        info!("cloned {} into {}", url, destination.display());
        println!(
            "{} {}",
            theme::success("Repositorio clonado con éxito en:"),
            destination.display()
        );

        Ok(self.show_file_preview(destination))
    }

    /// Print files at the clone root and inside any `src`/`lib` directory
    pub fn show_file_preview(&self, root: &Path) -> Vec<PathBuf> {
        println!("\n{}", theme::heading("Vista previa de archivos en el proyecto:"));

        let files = preview_files(root, self.preview_dirs);
        for file in &files {
            println!("-  {}", file.display());
        }

        println!("\nFinal de la vista previa de archivos.");
        files
    }
}

/// Files whose parent is `root` itself or a directory whose base name is in `dirs`
pub fn preview_files(root: &Path, dirs: &[String]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let parent = match entry.path().parent() {
                Some(p) => p,
                None => return false,
            };
            parent == root
                || parent
                    .file_name()
                    .map(|name| dirs.iter().any(|d| name == d.as_str()))
                    .unwrap_or(false)
        })
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}
