use crate::config::SetupConfig;
use crate::error::SetupResult;
use crate::install::{
    DependencyInstaller, EnvironmentPreparer, InstallReport, Preparation, TargetedInstaller, TargetedStatus,
};
use crate::process::{CommandRunner, ToolLocator};
use crate::resolver::{DependencyDetector, DependencyMap, ProbeReport, RepositoryProber, UrlValidator};
use crate::ui::{theme, Prompter};
use crate::workspace::{Cloner, DestinationSelector};
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a run stopped before the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    InvalidUrl,
    ProbeFailed,
    DestinationUnavailable,
    CloneFailed,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AbortReason::InvalidUrl => "repository URL is not reachable",
            AbortReason::ProbeFailed => "repository could not be inspected",
            AbortReason::DestinationUnavailable => "clone destination could not be prepared",
            AbortReason::CloneFailed => "clone failed",
        };
        f.write_str(text)
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub url: String,
    pub probe: ProbeReport,
    pub destination: PathBuf,
    pub previewed: Vec<PathBuf>,
    pub dependencies: DependencyMap,
    pub install: InstallReport,
    pub preparation: Preparation,
    pub python_install: TargetedStatus,
    pub node_install: TargetedStatus,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(Box<RunSummary>),
    Aborted(AbortReason),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// The whole assistant: validate, probe, choose destination, clone, detect,
/// install, prepare the environment, then the targeted installs.
///
/// `work_dir` stands in for the invoking directory. It is the default clone
/// destination and the place where the virtual environment, settings file and
/// targeted installs live.
pub struct Pipeline<'a> {
    config: &'a SetupConfig,
    runner: &'a dyn CommandRunner,
    locator: &'a dyn ToolLocator,
    work_dir: PathBuf,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a SetupConfig,
        runner: &'a dyn CommandRunner,
        locator: &'a dyn ToolLocator,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            runner,
            locator,
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn run(&self, prompter: &mut dyn Prompter) -> SetupResult<Outcome> {
        let cfg = self.config;
        println!(
            "{}",
            theme::heading("Bienvenido al asistente de configuración de su entorno de desarrollo.")
        );

        // Step 1: repository URL
        let url = prompter.ask("Ingrese el URL del repositorio de Git")?;

        // Step 2: reachability
        if !UrlValidator::new(self.runner, &cfg.git).validate(&url) {
            println!("Proceso terminado. Verifique el URL e intente de nuevo.");
            return Ok(Outcome::Aborted(AbortReason::InvalidUrl));
        }
        println!("\n{}", theme::success("URL verificado correctamente."));

        // Step 3: preview from a scratch clone
        let probe = match RepositoryProber::new(self.runner, &cfg.git)
            .with_scratch_root(cfg.scratch_root.as_deref())
            .probe(&url)
        {
            Ok(probe) if !probe.files.is_empty() => probe,
            Ok(_) => return Ok(self.abort_probe(None)),
            Err(e) => return Ok(self.abort_probe(Some(e.to_string()))),
        };
        println!("\nNombre del repositorio: {}", probe.name);
        println!(
            "Archivos del repositorio (vista previa de {} archivos):",
            cfg.preview_limit
        );
        for file in probe.preview(cfg.preview_limit) {
            println!("  - {}", file.display());
        }

        // Step 4: destination
        let destination = match DestinationSelector::select(prompter, &self.work_dir)? {
            Some(dir) => dir,
            None => {
                println!(
                    "{}",
                    theme::error("Error al seleccionar la carpeta de clonación. Proceso terminado.")
                );
                return Ok(Outcome::Aborted(AbortReason::DestinationUnavailable));
            }
        };
        println!("\nEl repositorio se clonará en: {}", destination.display());

        // Step 5: last chance to back out with Ctrl+C
        prompter.pause(
            "\nConfiguración inicial completada. Presione Enter para continuar con la clonación...",
        )?;

        // Step 6: the real clone
        let previewed = match Cloner::new(self.runner, &cfg.git, &cfg.preview_dirs)
            .clone_repository(&url, &destination)
        {
            Ok(files) => files,
            Err(e) => {
                warn!("{}", e);
                println!("Proceso terminado.");
                return Ok(Outcome::Aborted(AbortReason::CloneFailed));
            }
        };
        println!("{}", theme::success("Repositorio clonado exitosamente."));

        // Step 7: what does the project need
        let dependencies = DependencyDetector::new(cfg.venv_dir.clone()).detect_and_report(&destination);

        // Step 8: toolchains and project installs
        let install = DependencyInstaller::new(self.runner, self.locator, cfg)
            .install(prompter, &dependencies, &destination)?;

        // Steps 9 and 10: virtual environment and settings file
        let preparation = EnvironmentPreparer::new(self.runner, cfg).prepare(&self.work_dir)?;

        // Steps 11 and 12: checked installs in the working directory
        let targeted = TargetedInstaller::new(self.runner, cfg);
        let python_install = targeted.install_python(&self.work_dir, &preparation.settings)?;
        let node_install = targeted.install_node(&self.work_dir, &preparation.settings)?;

        info!("setup finished for {}", url);
        Ok(Outcome::Completed(Box::new(RunSummary {
            url,
            probe,
            destination,
            previewed,
            dependencies,
            install,
            preparation,
            python_install,
            node_install,
        })))
    }

    fn abort_probe(&self, reason: Option<String>) -> Outcome {
        if let Some(reason) = reason {
            warn!("{}", reason);
        }
        println!(
            "{}",
            theme::error("No se pudieron obtener los detalles del repositorio. Proceso terminado.")
        );
        Outcome::Aborted(AbortReason::ProbeFailed)
    }
}
