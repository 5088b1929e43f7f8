//! `[base]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[base]` section in workerpack.toml - project metadata.
///
/// # Example
/// ```toml
/// [base]
/// version = "2.4.0"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Version stamped into the pages, the constants and the banner.
    /// Falls back to the `version` field of `manifest` when unset.
    #[serde(default = "defaults::base::version")]
    #[educe(Default = defaults::base::version())]
    pub version: Option<String>,

    /// JSON manifest carrying the project version.
    #[serde(default = "defaults::base::manifest")]
    #[educe(Default = defaults::base::manifest())]
    pub manifest: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::PackConfig;
    use std::path::Path;

    #[test]
    fn test_base_config_version() {
        let config: PackConfig = toml::from_str(
            r#"
            [base]
            version = "1.2.3"
        "#,
        )
        .unwrap();

        assert_eq!(config.base.version.as_deref(), Some("1.2.3"));
        assert_eq!(config.base.manifest, Path::new("package.json"));
    }

    #[test]
    fn test_base_config_unknown_field() {
        let result: Result<PackConfig, _> = toml::from_str(
            r#"
            [base]
            title = "worker"
        "#,
        );
        assert!(result.is_err());
    }
}
