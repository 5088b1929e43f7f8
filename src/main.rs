//! workerpack - assemble a single-file edge worker from html templates.

mod assets;
mod build;
mod bundle;
mod cli;
mod config;
mod error;
mod package;
mod stamp;
mod utils;

use anyhow::Result;
use build::build_worker;
use bundle::EsbuildCompiler;
use clap::Parser;
use cli::Cli;
use config::PackConfig;
use stamp::GitRevision;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_err!("build"; "Build failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Load and validate configuration, then build with the default back-ends.
fn run(cli: &Cli) -> Result<()> {
    let config = PackConfig::load(cli)?;
    config.validate()?;

    if config.config_path.is_file() {
        log!("config"; "loaded {}", config.config_path.display());
    }
    log!("build"; "version {}", config.version());

    let compiler = EsbuildCompiler::new(config.bundle.command.clone(), config.get_root());
    let revisions = GitRevision::new(config.get_root());

    let output = build_worker(&config, &compiler, &revisions)?;
    log!(
        "build";
        "{} bytes raw, {} bytes zipped",
        output.raw_bytes.len(),
        output.archive_bytes.len()
    );
    Ok(())
}
