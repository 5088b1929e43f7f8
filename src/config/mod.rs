//! Build configuration management for `workerpack.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[base]`    | Project metadata (version source)             |
//! | `[build]`   | Template root, entry, icon, output artifacts  |
//! | `[bundle]`  | Bundler command, target, external modules     |
//!
//! The file is optional; every field has a default matching the usual
//! worker project layout.
//!
//! # Example
//!
//! ```toml
//! [base]
//! version = "2.4.0"
//!
//! [build]
//! assets = "src/assets"
//! output = "dist"
//!
//! [bundle]
//! command = ["npx", "esbuild"]
//! ```

mod base;
mod build;
mod bundle;
pub mod defaults;
mod error;

use base::BaseConfig;
use build::BuildConfig;
use bundle::BundleConfig;
use error::ConfigError;

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing workerpack.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project metadata
    #[serde(default)]
    pub base: BaseConfig,

    /// Build paths and artifact names
    #[serde(default)]
    pub build: BuildConfig,

    /// Bundler invocation
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// The subset of `package.json` we read.
#[derive(Debug, Deserialize)]
struct Manifest {
    version: Option<String>,
}

impl PackConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PackConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, apply overrides and resolve the version.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)
                .with_context(|| format!("Failed to load `{}`", config_path.display()))?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.resolve_version(cli.version_string.as_deref())?;

        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// The resolved version string (empty until `resolve_version` ran).
    pub fn version(&self) -> &str {
        self.base.version.as_deref().unwrap_or_default()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.assets, cli.assets.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.build.entry, cli.entry.as_ref());

        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_name));

        self.base.manifest = Self::normalize_path(&root.join(&self.base.manifest));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.entry = Self::normalize_path(&root.join(&self.build.entry));
        self.build.icon = Self::normalize_path(&root.join(&self.build.icon));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Settle the version: CLI override, then `[base] version`, then the manifest.
    pub fn resolve_version(&mut self, cli_version: Option<&str>) -> Result<()> {
        if let Some(version) = cli_version {
            self.base.version = Some(version.to_owned());
            return Ok(());
        }
        if self.base.version.is_some() {
            return Ok(());
        }

        let manifest_path = &self.base.manifest;
        if !manifest_path.exists() {
            bail!(ConfigError::Validation(format!(
                "no [base.version] set and `{}` not found",
                manifest_path.display()
            )));
        }

        let content = fs::read_to_string(manifest_path)
            .map_err(|err| ConfigError::Io(manifest_path.clone(), err))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .map_err(|err| ConfigError::Manifest(manifest_path.clone(), err))?;

        match manifest.version {
            Some(version) => self.base.version = Some(version),
            None => bail!(ConfigError::Validation(format!(
                "`{}` has no `version` field",
                manifest_path.display()
            ))),
        }
        Ok(())
    }

    /// Validate configuration before the build starts
    pub fn validate(&self) -> Result<()> {
        if self.version().trim().is_empty() {
            bail!(ConfigError::Validation("version must not be empty".into()));
        }

        Self::check_command_installed("[bundle.command]", &self.bundle.command)?;

        if !self.build.assets.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.assets] `{}` is not a directory",
                self.build.assets.display()
            )));
        }
        if !self.build.entry.is_file() {
            bail!(ConfigError::Validation(format!(
                "[build.entry] `{}` not found",
                self.build.entry.display()
            )));
        }
        if !self.build.icon.is_file() {
            bail!(ConfigError::Validation(format!(
                "[build.icon] `{}` not found",
                self.build.icon.display()
            )));
        }

        for (field, value) in [
            ("[build.raw_name]", &self.build.raw_name),
            ("[build.archive_name]", &self.build.archive_name),
            ("[build.archive_entry]", &self.build.archive_entry),
        ] {
            if value.trim().is_empty() {
                bail!(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        match self.bundle.external.as_slice() {
            [module] if !module.trim().is_empty() => {}
            _ => bail!(ConfigError::Validation(
                "[bundle.external] must name exactly one runtime module".into()
            )),
        }

        if self.build.raw_name == self.build.archive_name {
            bail!(ConfigError::Validation(
                "[build.raw_name] and [build.archive_name] must differ".into()
            ));
        }

        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        if command.is_empty() {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        }

        let cmd = &command[0];
        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
