use super::environment::{EnvSettings, OsFamily};
use crate::config::SetupConfig;
use crate::error::SetupResult;
use crate::process::{CommandRunner, CommandSpec};
use crate::ui::theme;
use log::info;
use std::path::Path;

/// Whether a targeted install ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetedStatus {
    Installed,
    /// The manifest was not in the working directory
    Skipped,
}

/// Installs project dependencies in the working directory. Unlike the
/// interactive project commands these are checked: a failure is an error.
pub struct TargetedInstaller<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a SetupConfig,
    os: OsFamily,
}

impl<'a> TargetedInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a SetupConfig) -> Self {
        Self {
            runner,
            config,
            os: OsFamily::current(),
        }
    }

    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    /// `<venv>/bin/pip install -r requirements.txt`
    pub fn install_python(&self, work_dir: &Path, settings: &EnvSettings) -> SetupResult<TargetedStatus> {
        if !work_dir.join("requirements.txt").exists() {
            println!("No se detectó requirements.txt. Saltando instalación de dependencias de Python.");
            return Ok(TargetedStatus::Skipped);
        }

        println!("Se detectó requirements.txt. Instalando dependencias de Python...");
        let pip = self.os.venv_pip(&work_dir.join(&self.config.venv_dir));
        let spec = CommandSpec::new(pip.to_string_lossy())
            .args(["install", "-r", "requirements.txt"])
            .current_dir(work_dir)
            .envs(settings.vars());

        self.runner.run(&spec)?.check(&spec)?;

        info!("python requirements installed in {}", work_dir.display());
        println!("{}", theme::success("Dependencias de Python instaladas correctamente."));
        Ok(TargetedStatus::Installed)
    }

    /// `npm install`
    pub fn install_node(&self, work_dir: &Path, settings: &EnvSettings) -> SetupResult<TargetedStatus> {
        if !work_dir.join("package.json").exists() {
            println!("No se detectó package.json. Saltando instalación de dependencias de Node.js.");
            return Ok(TargetedStatus::Skipped);
        }

        println!("Se detectó package.json. Instalando dependencias de Node.js...");
        let spec = CommandSpec::new(&self.config.npm)
            .arg("install")
            .current_dir(work_dir)
            .envs(settings.vars());

        self.runner.run(&spec)?.check(&spec)?;

        info!("node dependencies installed in {}", work_dir.display());
        println!("{}", theme::success("Dependencias de Node.js instaladas correctamente."));
        Ok(TargetedStatus::Installed)
    }
}
