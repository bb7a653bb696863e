pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod pipeline;
pub mod process;
pub mod resolver;
pub mod ui;
pub mod workspace;

pub use config::SetupConfig;
pub use error::{SetupError, SetupResult};
pub use pipeline::{AbortReason, Outcome, Pipeline, RunSummary};
