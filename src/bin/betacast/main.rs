use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::Path;

mod cli;
mod io;
mod simulation;
fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    match args.verbosity {
        cli::LogLevel::Silent => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        cli::LogLevel::Normal => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
        }
        cli::LogLevel::Verbose => {
            env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();
        }
    }

    info!("Running infection rate estimation");
    let request = simulation::build_request(&args)?;

    // Create output directory
    let out_path = Path::new(&args.out);
    if out_path.exists() {
        bail!("Output directory already exists: {}", args.out);
    }
    std::fs::create_dir(out_path)
        .with_context(|| format!("Could not create output directory: {}", args.out))?;
    info!("Created output directory");

    simulation::betacast(&request, out_path)?;
    info!("Finished");
    Ok(())
}
