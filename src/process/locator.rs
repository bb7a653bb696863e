use std::path::PathBuf;

/// Finds executables on the search path
pub trait ToolLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;

    fn is_available(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }
}

/// Looks tools up on `PATH` with the `which` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}
