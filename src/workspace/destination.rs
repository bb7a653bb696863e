use crate::error::SetupResult;
use crate::ui::{theme, Prompter};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Error: No tienes permisos para crear la carpeta en esa ubicación.";

/// Decides where the repository will be cloned
pub struct DestinationSelector;

impl DestinationSelector {
    /// Returns `None` when a custom directory could not be created.
    ///
    /// Only the exact answer `s` switches to a custom directory; everything
    /// else keeps `default_dir`. A relative answer is taken from `default_dir`.
    pub fn select(prompter: &mut dyn Prompter, default_dir: &Path) -> SetupResult<Option<PathBuf>> {
        println!("\nCarpeta de clonación predeterminada: {}", default_dir.display());

        if !prompter.confirm("¿Desea cambiar la carpeta de clonación?")? {
            return Ok(Some(default_dir.to_path_buf()));
        }

        let answer = prompter.ask("Ingrese la ruta de la carpeta deseada")?;
        let user_dir = if answer.is_empty() {
            PathBuf::new()
        } else {
            default_dir.join(answer)
        };
        Ok(Self::prepare(&user_dir))
    }

    /// Create `dir` and its parents, reporting failures instead of returning them
    pub fn prepare(dir: &Path) -> Option<PathBuf> {
        match ensure_dir(dir) {
            Ok(()) => {
                println!("Carpeta de clonación configurada en: {}", dir.display());
                Some(dir.to_path_buf())
            }
            Err(e) => {
                println!("{}", theme::error(&failure_message(&e)));
                None
            }
        }
    }
}

fn failure_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED_MESSAGE.to_string(),
        _ => format!(
            "Error: No se pudo crear la carpeta de clonación. Detalles: {}",
            err
        ),
    }
}

/// Recursive and idempotent; used for every directory the assistant creates
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
    }
    debug!("ensuring directory {}", dir.display());
    std::fs::create_dir_all(dir)
}
