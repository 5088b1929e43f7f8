//! Command-line interface definitions.
//!
//! Defines all CLI arguments using clap.

use clap::Parser;
use std::path::PathBuf;

/// Build a single-file edge worker from html templates and a js entry
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory path
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: workerpack.toml)
    #[arg(short = 'C', long, default_value = "workerpack.toml")]
    pub config: PathBuf,

    /// Template directory path (relative to project root)
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker entry module (relative to project root)
    #[arg(short, long)]
    pub entry: Option<PathBuf>,

    /// Override the version stamped into the build.
    ///
    /// Takes precedence over `[base] version` and package.json.
    #[arg(long = "version-string")]
    pub version_string: Option<String>,
}
