//! `[build]` section configuration.
//!
//! Input and output locations of the worker build.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in workerpack.toml - build paths and artifact names.
///
/// # Example
/// ```toml
/// [build]
/// assets = "src/assets"    # One directory per page
/// entry = "src/worker.js"  # Module handed to the bundler
/// output = "dist"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Template root; every directory holding an `index.html` is a page.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Entry module of the worker.
    #[serde(default = "defaults::build::entry")]
    #[educe(Default = defaults::build::entry())]
    pub entry: PathBuf,

    /// Binary icon embedded as the `__ICON__` constant.
    #[serde(default = "defaults::build::icon")]
    #[educe(Default = defaults::build::icon())]
    pub icon: PathBuf,

    /// Output directory for both artifacts.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// File name of the raw script inside `output`.
    #[serde(default = "defaults::build::raw_name")]
    #[educe(Default = defaults::build::raw_name())]
    pub raw_name: String,

    /// File name of the archive inside `output`.
    #[serde(default = "defaults::build::archive_name")]
    #[educe(Default = defaults::build::archive_name())]
    pub archive_name: String,

    /// Name of the single entry stored in the archive.
    #[serde(default = "defaults::build::archive_entry")]
    #[educe(Default = defaults::build::archive_entry())]
    pub archive_entry: String,
}

impl BuildConfig {
    pub fn raw_path(&self) -> PathBuf {
        self.output.join(&self.raw_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output.join(&self.archive_name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::PackConfig;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_build_config_defaults() {
        let config = PackConfig::default();

        assert_eq!(config.build.assets, PathBuf::from("src/assets"));
        assert_eq!(config.build.entry, PathBuf::from("src/worker.js"));
        assert_eq!(config.build.raw_path(), Path::new("dist/worker.js"));
        assert_eq!(config.build.archive_path(), Path::new("dist/worker.zip"));
        assert_eq!(config.build.archive_entry, "_worker.js");
    }

    #[test]
    fn test_build_config_partial_override() {
        let config: PackConfig = toml::from_str(
            r#"
            [build]
            output = "out"
            archive_name = "bundle.zip"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.archive_path(), Path::new("out/bundle.zip"));
        assert_eq!(config.build.raw_path(), Path::new("out/worker.js"));
    }
}
