//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn version() -> Option<String> {
        None
    }

    /// Project manifest consulted when no version is configured.
    pub fn manifest() -> std::path::PathBuf {
        "package.json".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn assets() -> PathBuf {
        "src/assets".into()
    }

    pub fn entry() -> PathBuf {
        "src/worker.js".into()
    }

    pub fn icon() -> PathBuf {
        "src/assets/favicon.ico".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn raw_name() -> String {
        "worker.js".into()
    }

    pub fn archive_name() -> String {
        "worker.zip".into()
    }

    pub fn archive_entry() -> String {
        "_worker.js".into()
    }
}

// ============================================================================
// [bundle] Section Defaults
// ============================================================================

pub mod bundle {
    pub fn command() -> Vec<String> {
        vec!["esbuild".into()]
    }

    pub fn target() -> String {
        "es2020".into()
    }

    pub fn platform() -> String {
        "browser".into()
    }

    /// Supplied by the workers runtime, never bundled.
    pub fn external() -> Vec<String> {
        vec!["cloudflare:sockets".into()]
    }
}
