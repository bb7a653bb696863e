pub mod toolchain;
pub mod environment;
pub mod targeted;

pub use toolchain::{DependencyInstaller, InstallReport, ProjectCommand, ToolOffer};
pub use environment::{EnvironmentPreparer, EnvSettings, OsFamily, Preparation, VenvStatus};
pub use targeted::{TargetedInstaller, TargetedStatus};
