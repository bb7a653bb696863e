use crate::config::SetupConfig;
use crate::pipeline::{Outcome, Pipeline};
use crate::process::{PathLocator, SystemRunner};
use crate::ui::{InteractivePrompter, Theme};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "devsetup")]
#[command(version, about = "Interactive development environment setup assistant", long_about = None)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "DEVSETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working directory: default clone destination, venv and .env location
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Default log filter; `RUST_LOG` still wins
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

pub fn init_logging(args: &Args) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();
}

pub fn run(args: Args) -> Result<Outcome> {
    Theme::from_flag(args.no_color).apply();

    let config = SetupConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    debug!("configuration: {:?}", config);

    let work_dir = match args.workdir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let runner = SystemRunner;
    let locator = PathLocator;
    let mut prompter = InteractivePrompter::new();

    let pipeline = Pipeline::new(&config, &runner, &locator, work_dir);
    let outcome = pipeline
        .run(&mut prompter)
        .context("Setup did not complete")?;

    match &outcome {
        Outcome::Completed(summary) => info!("completed setup of {}", summary.destination.display()),
        Outcome::Aborted(reason) => info!("stopped early: {}", reason),
    }

    Ok(outcome)
}
