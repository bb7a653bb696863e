use crate::config::SetupConfig;
use crate::error::SetupResult;
use crate::process::{CommandRunner, CommandSpec, ToolLocator};
use crate::resolver::{DependencyMap, Ecosystem};
use crate::ui::{theme, Prompter};
use log::{info, warn};
use std::path::Path;

/// A missing tool together with how to get it
#[derive(Debug, Clone)]
pub struct ToolOffer {
    pub name: String,
    pub install: CommandSpec,
    pub manual: String,
}

/// Project-level install command for one detected ecosystem
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCommand {
    pub ecosystem: Ecosystem,
    pub command: String,
    pub manual: String,
}

/// What the installer did, for the caller and for tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    /// git was missing, nothing else was attempted
    pub aborted: bool,
    /// Tools offered for installation
    pub offered: Vec<String>,
    pub installed: Vec<String>,
    pub failed: Vec<String>,
    /// Project commands the user chose to run
    pub project_commands: Vec<String>,
    /// Project commands that ran but failed
    pub project_failures: Vec<String>,
}

/// Makes sure the toolchains for the detected ecosystems exist, then offers
/// the project install commands.
pub struct DependencyInstaller<'a> {
    runner: &'a dyn CommandRunner,
    locator: &'a dyn ToolLocator,
    config: &'a SetupConfig,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, locator: &'a dyn ToolLocator, config: &'a SetupConfig) -> Self {
        Self {
            runner,
            locator,
            config,
        }
    }

    pub fn install(
        &self,
        prompter: &mut dyn Prompter,
        deps: &DependencyMap,
        project_dir: &Path,
    ) -> SetupResult<InstallReport> {
        let mut report = InstallReport::default();

        if !self.locator.is_available(&self.config.git) {
            println!(
                "{}",
                theme::error("Error: Git no está instalado. Por favor, instala Git y vuelve a intentarlo.")
            );
            report.aborted = true;
            return Ok(report);
        }

        for offer in self.missing_tools(deps) {
            self.offer_install(prompter, &offer, &mut report)?;
        }

        for cmd in self.project_commands(deps) {
            self.offer_project_command(prompter, &cmd, project_dir, &mut report)?;
        }

        Ok(report)
    }

    /// Phase A: tools the detected ecosystems need but the system lacks
    pub fn missing_tools(&self, deps: &DependencyMap) -> Vec<ToolOffer> {
        let mut offers = Vec::new();
        let cfg = self.config;

        if deps.contains(Ecosystem::NodeJs) {
            if !self.locator.is_available(&cfg.node) || !self.locator.is_available(&cfg.npm) {
                offers.push(ToolOffer {
                    name: "Node.js y npm".to_string(),
                    install: CommandSpec::new(&cfg.npm).args(["install", "-g", "node"]),
                    manual: "Visita https://nodejs.org para descargar e instalar Node.js y npm.".to_string(),
                });
            } else {
                println!("{}", theme::success("Node.js y npm ya están instalados."));
            }
        }

        if deps.contains(Ecosystem::Python) {
            if !self.locator.is_available(&cfg.python) {
                offers.push(ToolOffer {
                    name: "Python".to_string(),
                    install: CommandSpec::new("apt-get").args(["install", "python3"]),
                    manual: "Instala Python desde https://www.python.org/ para obtener la versión adecuada."
                        .to_string(),
                });
            }
            if !self.locator.is_available(&cfg.pip) {
                offers.push(ToolOffer {
                    name: "pip".to_string(),
                    install: CommandSpec::new(&cfg.python).args(["-m", "ensurepip", "--upgrade"]),
                    manual: format!(
                        "Instala pip con el comando '{} -m ensurepip --upgrade' o descarga desde https://pip.pypa.io.",
                        cfg.python
                    ),
                });
            }
        }

        offers
    }

    /// Phase B: project install commands for what was detected
    pub fn project_commands(&self, deps: &DependencyMap) -> Vec<ProjectCommand> {
        let cfg = self.config;
        let mut commands = Vec::new();

        if deps.contains(Ecosystem::NodeJs) {
            commands.push(ProjectCommand {
                ecosystem: Ecosystem::NodeJs,
                command: format!("{} install", cfg.npm),
                manual: format!("Ejecuta '{} install' en el directorio del proyecto.", cfg.npm),
            });
        }

        match deps.get(Ecosystem::Python) {
            Some("Pipfile") => commands.push(ProjectCommand {
                ecosystem: Ecosystem::Python,
                command: format!("{} install", cfg.pipenv),
                manual: format!("Ejecuta '{} install' en el directorio del proyecto.", cfg.pipenv),
            }),
            Some(manifest) => commands.push(ProjectCommand {
                ecosystem: Ecosystem::Python,
                command: format!("{} install -r {}", cfg.pip, manifest),
                manual: format!("Ejecuta '{} install -r {}' en el entorno virtual.", cfg.pip, manifest),
            }),
            None => {}
        }

        commands
    }

    fn offer_install(
        &self,
        prompter: &mut dyn Prompter,
        offer: &ToolOffer,
        report: &mut InstallReport,
    ) -> SetupResult<()> {
        println!("\nSe necesita instalar {}.", offer.name);
        report.offered.push(offer.name.clone());

        if !prompter.confirm(&format!("¿Quieres instalar {} automáticamente?", offer.name))? {
            println!("Instrucciones para instalar {} manualmente:", offer.name);
            println!("{}", theme::detail(&offer.manual));
            return Ok(());
        }

        println!("Instalando {}...", offer.name);
        let succeeded = match self.runner.run(&offer.install) {
            Ok(outcome) => outcome.success,
            Err(e) => {
                warn!("{}", e);
                false
            }
        };

        if succeeded {
            info!("installed {} with `{}`", offer.name, offer.install);
            println!("{}", theme::success(&format!("{} se instaló correctamente.", offer.name)));
            report.installed.push(offer.name.clone());
        } else {
            println!(
                "{}",
                theme::error(&format!("Error: No se pudo instalar {} automáticamente.", offer.name))
            );
            report.failed.push(offer.name.clone());
        }

        Ok(())
    }

    fn offer_project_command(
        &self,
        prompter: &mut dyn Prompter,
        cmd: &ProjectCommand,
        project_dir: &Path,
        report: &mut InstallReport,
    ) -> SetupResult<()> {
        println!("\nPara completar la instalación de {}:", cmd.ecosystem);

        if !prompter.confirm(&format!("¿Quieres ejecutar '{}' automáticamente?", cmd.command))? {
            println!("Instrucción: {}", cmd.manual);
            return Ok(());
        }

        report.project_commands.push(cmd.command.clone());
        let spec = CommandSpec::shell(&cmd.command).current_dir(project_dir);

        // Best effort: a failing project install never stops the run
        match self.runner.run(&spec) {
            Ok(outcome) if outcome.success => {
                println!("{}", theme::success(&format!("{} se configuró correctamente.", cmd.ecosystem)));
            }
            Ok(outcome) => {
                warn!("`{}` failed: {}", cmd.command, outcome.status_text());
                println!(
                    "{}",
                    theme::warning(&format!("'{}' no terminó correctamente. {}", cmd.command, cmd.manual))
                );
                report.project_failures.push(cmd.command.clone());
            }
            Err(e) => {
                warn!("{}", e);
                println!(
                    "{}",
                    theme::warning(&format!("No se pudo ejecutar '{}'. {}", cmd.command, cmd.manual))
                );
                report.project_failures.push(cmd.command.clone());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutcome;
    use crate::ui::ScriptedPrompter;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Tools(HashSet<&'static str>);

    impl ToolLocator for Tools {
        fn locate(&self, name: &str) -> Option<PathBuf> {
            self.0.contains(name).then(|| PathBuf::from("/usr/bin").join(name))
        }
    }

    fn tools(names: &[&'static str]) -> Tools {
        Tools(names.iter().copied().collect())
    }

    #[derive(Default)]
    struct Recorder {
        fail: bool,
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, spec: &CommandSpec) -> SetupResult<CommandOutcome> {
            self.seen.borrow_mut().push(spec.to_string());
            if self.fail {
                Ok(CommandOutcome::failed(1, "boom"))
            } else {
                Ok(CommandOutcome::ok())
            }
        }
    }

    fn node_only() -> DependencyMap {
        let mut deps = DependencyMap::new();
        deps.insert(Ecosystem::NodeJs, "package.json");
        deps
    }

    #[test]
    fn test_missing_git_aborts_everything() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&[]);
        let mut prompter = ScriptedPrompter::new(["s", "s", "s"]);
        let dir = TempDir::new().unwrap();

        let report = DependencyInstaller::new(&runner, &locator, &config)
            .install(&mut prompter, &node_only(), dir.path())
            .unwrap();

        assert!(report.aborted);
        assert!(prompter.asked().is_empty());
        assert!(runner.seen.borrow().is_empty());
    }

    #[test]
    fn test_node_missing_offers_install() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&["git", "node"]);
        let mut prompter = ScriptedPrompter::new(["s", "n"]);
        let dir = TempDir::new().unwrap();

        let report = DependencyInstaller::new(&runner, &locator, &config)
            .install(&mut prompter, &node_only(), dir.path())
            .unwrap();

        assert_eq!(report.offered, vec!["Node.js y npm"]);
        assert_eq!(report.installed, vec!["Node.js y npm"]);
        assert!(report.project_commands.is_empty());
        assert_eq!(runner.seen.borrow().as_slice(), &["npm install -g node"]);
        assert_eq!(prompter.asked()[1], "¿Quieres ejecutar 'npm install' automáticamente? (s/n)");
    }

    #[test]
    fn test_node_present_skips_offer() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&["git", "node", "npm"]);
        let installer = DependencyInstaller::new(&runner, &locator, &config);

        assert!(installer.missing_tools(&node_only()).is_empty());
    }

    #[test]
    fn test_python_checks_interpreter_and_pip_independently() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&["git"]);
        let mut deps = DependencyMap::new();
        deps.insert(Ecosystem::Python, "requirements.txt");

        let offers = DependencyInstaller::new(&runner, &locator, &config).missing_tools(&deps);
        let names: Vec<_> = offers.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "pip"]);
        assert_eq!(offers[1].install.to_string(), "python3 -m ensurepip --upgrade");
    }

    #[test]
    fn test_failed_tool_install_does_not_block_other_ecosystem() {
        let config = SetupConfig::default();
        let runner = Recorder {
            fail: true,
            ..Default::default()
        };
        let locator = tools(&["git"]);
        let mut deps = node_only();
        deps.insert(Ecosystem::Python, "requirements.txt");
        let mut prompter = ScriptedPrompter::new(["s", "s", "s"]);
        let dir = TempDir::new().unwrap();

        let report = DependencyInstaller::new(&runner, &locator, &config)
            .install(&mut prompter, &deps, dir.path())
            .unwrap();

        assert_eq!(report.failed, vec!["Node.js y npm", "Python", "pip"]);
        assert!(!report.aborted);
    }

    #[test]
    fn test_project_command_failure_is_best_effort() {
        let config = SetupConfig::default();
        let runner = Recorder {
            fail: true,
            ..Default::default()
        };
        let locator = tools(&["git", "node", "npm", "python3", "pip"]);
        let mut deps = node_only();
        deps.insert(Ecosystem::Python, "requirements.txt");
        let mut prompter = ScriptedPrompter::new(["s", "s"]);
        let dir = TempDir::new().unwrap();

        let report = DependencyInstaller::new(&runner, &locator, &config)
            .install(&mut prompter, &deps, dir.path())
            .unwrap();

        assert_eq!(report.project_commands, vec!["npm install", "pip install -r requirements.txt"]);
        assert_eq!(report.project_failures.len(), 2);
    }

    #[test]
    fn test_pipfile_uses_pipenv() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&["git"]);
        let mut deps = DependencyMap::new();
        deps.insert(Ecosystem::Python, "Pipfile");

        let commands = DependencyInstaller::new(&runner, &locator, &config).project_commands(&deps);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command, "pipenv install");
    }

    #[test]
    fn test_venv_marker_has_no_project_command() {
        let config = SetupConfig::default();
        let runner = Recorder::default();
        let locator = tools(&["git"]);
        let mut deps = DependencyMap::new();
        deps.insert(Ecosystem::PythonVenv, "venv");

        let installer = DependencyInstaller::new(&runner, &locator, &config);
        assert!(installer.project_commands(&deps).is_empty());
        assert!(installer.missing_tools(&deps).is_empty());
    }
}
