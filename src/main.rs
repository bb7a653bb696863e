use anyhow::Result;
use clap::Parser;
use devsetup::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    cli::init_logging(&args);
    info!("Starting devsetup v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args).map(|_| ())
}
