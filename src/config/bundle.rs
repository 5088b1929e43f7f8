//! `[bundle]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[bundle]` section in workerpack.toml - bundler invocation.
///
/// # Example
/// ```toml
/// [bundle]
/// command = ["npx", "esbuild"]
/// target = "es2020"
/// external = ["cloudflare:sockets"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Bundler command and leading arguments.
    #[serde(default = "defaults::bundle::command")]
    #[educe(Default = defaults::bundle::command())]
    pub command: Vec<String>,

    /// Language level of the emitted module.
    #[serde(default = "defaults::bundle::target")]
    #[educe(Default = defaults::bundle::target())]
    pub target: String,

    #[serde(default = "defaults::bundle::platform")]
    #[educe(Default = defaults::bundle::platform())]
    pub platform: String,

    /// Module left as an import for the runtime to resolve; exactly one.
    #[serde(default = "defaults::bundle::external")]
    #[educe(Default = defaults::bundle::external())]
    pub external: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::super::PackConfig;

    #[test]
    fn test_bundle_config_defaults() {
        let config = PackConfig::default();

        assert_eq!(config.bundle.command, vec!["esbuild"]);
        assert_eq!(config.bundle.target, "es2020");
        assert_eq!(config.bundle.platform, "browser");
        assert_eq!(config.bundle.external, vec!["cloudflare:sockets"]);
    }

    #[test]
    fn test_bundle_config_command() {
        let config: PackConfig = toml::from_str(
            r#"
            [bundle]
            command = ["npx", "esbuild"]
        "#,
        )
        .unwrap();

        assert_eq!(config.bundle.command, vec!["npx", "esbuild"]);
        assert_eq!(config.bundle.external, vec!["cloudflare:sockets"]);
    }
}
