pub mod runner;
pub mod locator;

pub use runner::{CommandRunner, CommandSpec, CommandOutcome, OutputMode, SystemRunner};
pub use locator::{ToolLocator, PathLocator};
