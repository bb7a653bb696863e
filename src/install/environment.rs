use crate::config::SetupConfig;
use crate::error::{SetupError, SetupResult};
use crate::process::{CommandRunner, CommandSpec};
use crate::ui::theme;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Shell conventions for the activation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Posix,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Posix
        }
    }

    /// Command the user should run to activate the environment. Never executed.
    pub fn activation_command(&self, venv_dir: &str) -> String {
        match self {
            OsFamily::Windows => format!(r"{}\Scripts\activate.bat", venv_dir),
            OsFamily::Posix => format!("source {}/bin/activate", venv_dir),
        }
    }

    /// The environment's own pip
    pub fn venv_pip(&self, venv_dir: &Path) -> PathBuf {
        match self {
            OsFamily::Windows => venv_dir.join("Scripts").join("pip.exe"),
            OsFamily::Posix => venv_dir.join("bin").join("pip"),
        }
    }
}

/// Variables read from the settings file, handed to every later subprocess.
///
/// Variables already present in the process environment win and are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    vars: Vec<(String, String)>,
}

impl EnvSettings {
    pub fn from_path(path: &Path) -> SetupResult<Self> {
        Self::from_path_excluding(path, |key| std::env::var_os(key).is_some())
    }

    /// Like [`EnvSettings::from_path`], skipping every key `is_set` accepts
    pub fn from_path_excluding<F>(path: &Path, is_set: F) -> SetupResult<Self>
    where
        F: Fn(&str) -> bool,
    {
        let to_err = |source: dotenvy::Error| SetupError::Settings {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = Vec::new();
        for item in dotenvy::from_path_iter(path).map_err(to_err)? {
            let (key, value) = item.map_err(to_err)?;
            if is_set(&key) {
                debug!("{} is already set, keeping the existing value", key);
                continue;
            }
            vars.push((key, value));
        }
        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvStatus {
    Created,
    AlreadyPresent,
    /// Creation was attempted and failed; the run carries on
    Failed,
}

/// Result of preparing the working directory
#[derive(Debug, Clone, PartialEq)]
pub struct Preparation {
    pub venv: VenvStatus,
    pub activation: String,
    /// `None` when no settings file exists
    pub settings_file: Option<PathBuf>,
    pub settings: EnvSettings,
}

pub struct EnvironmentPreparer<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a SetupConfig,
    os: OsFamily,
}

impl<'a> EnvironmentPreparer<'a> {
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

    pub fn prepare(&self, work_dir: &Path) -> SetupResult<Preparation> {
        let venv = self.ensure_virtualenv(work_dir);
        let activation = self.print_activation();
        let (settings_file, settings) = self.load_settings(work_dir);

        Ok(Preparation {
            venv,
            activation,
            settings_file,
            settings,
        })
    }

    /// Create the virtual environment unless the directory already exists.
    /// Existence is all that is checked.
    pub fn ensure_virtualenv(&self, work_dir: &Path) -> VenvStatus {
        if work_dir.join(&self.config.venv_dir).exists() {
            println!("El entorno virtual ya existe.");
            return VenvStatus::AlreadyPresent;
        }

        println!("Creando entorno virtual en Python...");
        let spec = CommandSpec::new(&self.config.python)
            .args(["-m", "venv", self.config.venv_dir.as_str()])
            .current_dir(work_dir);

        match self.runner.run(&spec).and_then(|outcome| outcome.check(&spec)) {
            Ok(_) => {
                println!("{}", theme::success("Entorno virtual creado."));
                VenvStatus::Created
            }
            Err(e) => {
                warn!("{}", e);
                println!("{}", theme::error(&format!("Error: No se pudo crear el entorno virtual: {}", e)));
                VenvStatus::Failed
            }
        }
    }

    pub fn activation_command(&self) -> String {
        self.os.activation_command(&self.config.venv_dir)
    }

    fn print_activation(&self) -> String {
        let activation = self.activation_command();
        println!("Para activar el entorno virtual, ejecute: {}", activation);
        activation
    }

    /// Read the settings file if there is one. A malformed file is reported
    /// and treated as empty.
    pub fn load_settings(&self, work_dir: &Path) -> (Option<PathBuf>, EnvSettings) {
        let path = work_dir.join(&self.config.settings_file);
        if !path.exists() {
            println!(
                "No se encontró un archivo {}. Puedes crear uno para definir variables de entorno.",
                self.config.settings_file
            );
            return (None, EnvSettings::default());
        }

        println!(
            "Cargando variables de entorno desde el archivo {}...",
            self.config.settings_file
        );
        match EnvSettings::from_path(&path) {
            Ok(settings) => {
                debug!("loaded {} variables from {}", settings.len(), path.display());
                println!("{}", theme::success("Variables de entorno configuradas."));
                (Some(path), settings)
            }
            Err(e) => {
                warn!("{}", e);
                println!("{}", theme::error(&format!("Error: {}", e)));
                (Some(path), EnvSettings::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutcome;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Pretends to be `python3 -m venv` by creating the directory
    #[derive(Default)]
    struct VenvMaker {
        calls: RefCell<usize>,
    }

    impl CommandRunner for VenvMaker {
        fn run(&self, spec: &CommandSpec) -> SetupResult<CommandOutcome> {
            *self.calls.borrow_mut() += 1;
            let dir = spec.cwd.clone().unwrap();
            fs::create_dir_all(dir.join(spec.args.last().unwrap()))?;
            Ok(CommandOutcome::ok())
        }
    }

    #[test]
    fn test_activation_commands() {
        assert_eq!(OsFamily::Posix.activation_command("venv"), "source venv/bin/activate");
        assert_eq!(OsFamily::Windows.activation_command("venv"), r"venv\Scripts\activate.bat");
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = SetupConfig::default();
        let runner = VenvMaker::default();
        let preparer = EnvironmentPreparer::new(&runner, &config);

        let first = preparer.prepare(dir.path()).unwrap();
        let second = preparer.prepare(dir.path()).unwrap();

        assert_eq!(first.venv, VenvStatus::Created);
        assert_eq!(second.venv, VenvStatus::AlreadyPresent);
        assert_eq!(first.activation, second.activation);
        assert_eq!(*runner.calls.borrow(), 1);
    }

    #[test]
    fn test_venv_failure_is_reported() {
        struct Broken;
        impl CommandRunner for Broken {
            fn run(&self, _spec: &CommandSpec) -> SetupResult<CommandOutcome> {
                Ok(CommandOutcome::failed(1, "No module named venv"))
            }
        }

        let dir = TempDir::new().unwrap();
        let config = SetupConfig::default();
        let preparer = EnvironmentPreparer::new(&Broken, &config);
        assert_eq!(preparer.ensure_virtualenv(dir.path()), VenvStatus::Failed);
    }

    #[test]
    fn test_settings_loaded_into_object() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".env"),
            "# comment\nDEVSETUP_TEST_DATABASE_URL=postgres://localhost/dev\nDEVSETUP_TEST_DEBUG=\"true\"\n",
        )
        .unwrap();
        let config = SetupConfig::default();
        let runner = VenvMaker::default();

        let (path, settings) = EnvironmentPreparer::new(&runner, &config).load_settings(dir.path());
        assert_eq!(path, Some(dir.path().join(".env")));
        assert_eq!(settings.len(), 2);
        assert_eq!(settings.get("DEVSETUP_TEST_DATABASE_URL"), Some("postgres://localhost/dev"));
        assert_eq!(settings.get("DEVSETUP_TEST_DEBUG"), Some("true"));
        assert!(std::env::var_os("DEVSETUP_TEST_DATABASE_URL").is_none());
    }

    #[test]
    fn test_exported_variables_win_over_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DEVSETUP_TEST_EXPORTED=from_file\nDEVSETUP_TEST_FRESH=from_file\n").unwrap();
        std::env::set_var("DEVSETUP_TEST_EXPORTED", "from_shell");

        let settings = EnvSettings::from_path(&path).unwrap();
        assert_eq!(settings.get("DEVSETUP_TEST_EXPORTED"), None);
        assert_eq!(settings.get("DEVSETUP_TEST_FRESH"), Some("from_file"));
        assert_eq!(std::env::var("DEVSETUP_TEST_EXPORTED").unwrap(), "from_shell");
    }

    #[test]
    fn test_excluded_keys_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "HOME=/elsewhere\nAPI_TOKEN=abc\n").unwrap();

        let settings = EnvSettings::from_path_excluding(&path, |key| key == "HOME").unwrap();
        assert_eq!(settings.vars(), &[("API_TOKEN".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_missing_settings_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = SetupConfig::default();
        let runner = VenvMaker::default();

        let (path, settings) = EnvironmentPreparer::new(&runner, &config).load_settings(dir.path());
        assert!(path.is_none());
        assert!(settings.is_empty());
    }

    #[test]
    fn test_venv_pip_paths() {
        let venv = Path::new("venv");
        assert_eq!(OsFamily::Posix.venv_pip(venv), PathBuf::from("venv/bin/pip"));
        assert_eq!(
            OsFamily::Windows.venv_pip(venv),
            Path::new("venv").join("Scripts").join("pip.exe")
        );
    }
}
