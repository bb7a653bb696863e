use crate::ui::theme;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const NO_DEPENDENCIES_MESSAGE: &str = "No se detectaron dependencias específicas en el proyecto.";

/// Ecosystems the detector knows about, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ecosystem {
    NodeJs,
    Python,
    /// A `venv` directory already sits in the project
    PythonVenv,
}

impl Ecosystem {
    pub fn label(&self) -> &'static str {
        match self {
            Ecosystem::NodeJs => "Node.js",
            Ecosystem::Python => "Python",
            Ecosystem::PythonVenv => "Python virtual environment",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ecosystem -> manifest file that triggered it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    entries: BTreeMap<Ecosystem, String>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ecosystem: Ecosystem, manifest: impl Into<String>) {
        self.entries.insert(ecosystem, manifest.into());
    }

    pub fn get(&self, ecosystem: Ecosystem) -> Option<&str> {
        self.entries.get(&ecosystem).map(String::as_str)
    }

    pub fn contains(&self, ecosystem: Ecosystem) -> bool {
        self.entries.contains_key(&ecosystem)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ecosystem, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

pub struct DependencyDetector {
    venv_dir: String,
}

impl DependencyDetector {
    pub fn new(venv_dir: impl Into<String>) -> Self {
        Self {
            venv_dir: venv_dir.into(),
        }
    }

    /// Existence checks only, nothing is parsed or written
    pub fn detect(&self, project_dir: &Path) -> DependencyMap {
        let mut deps = DependencyMap::new();

        if project_dir.join("package.json").exists() {
            deps.insert(Ecosystem::NodeJs, "package.json");
        }

        // requirements.txt wins over Pipfile
        if project_dir.join("requirements.txt").exists() {
            deps.insert(Ecosystem::Python, "requirements.txt");
        } else if project_dir.join("Pipfile").exists() {
            deps.insert(Ecosystem::Python, "Pipfile");
        }

        if project_dir.join(&self.venv_dir).exists() {
            deps.insert(Ecosystem::PythonVenv, self.venv_dir.clone());
        }

        deps
    }

    /// Detect and print what was found
    pub fn detect_and_report(&self, project_dir: &Path) -> DependencyMap {
        println!("\n{}", theme::heading("--- Detectando dependencias ---"));

        let deps = self.detect(project_dir);
        for line in report_lines(&deps) {
            println!("{}", line);
        }
        deps
    }
}

/// What `detect_and_report` prints after its heading
pub fn report_lines(deps: &DependencyMap) -> Vec<String> {
    if deps.is_empty() {
        return vec![theme::warning(NO_DEPENDENCIES_MESSAGE).to_string()];
    }

    let mut lines: Vec<String> = deps
        .iter()
        .map(|(ecosystem, manifest)| match ecosystem {
            Ecosystem::NodeJs => format!("Archivo de configuración Node.js detectado ({}).", manifest),
            Ecosystem::Python => format!("Archivo de configuración de Python detectado ({}).", manifest),
            Ecosystem::PythonVenv => format!("Entorno virtual detectado ({}).", manifest),
        })
        .collect();

    lines.push(format!("\n{}", theme::heading("--- Resumen de dependencias detectadas ---")));
    lines.extend(
        deps.iter()
            .map(|(ecosystem, manifest)| format!("{} (configurado en: {})", ecosystem, manifest)),
    );
    lines
}

impl Default for DependencyDetector {
    fn default() -> Self {
        Self::new("venv")
    }
}
