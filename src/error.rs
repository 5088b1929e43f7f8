//! Build pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a build stage.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A non-`error` page lacks its `style.css` or `script.js`.
    #[error("page `{page}` is missing required asset `{}`", .path.display())]
    AssetMissing { page: String, path: PathBuf },

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bundler reported diagnostics.
    #[error("compile failed: {0}")]
    CompileError(String),

    #[error("packaging `{}` failed: {message}", .path.display())]
    PackagingError { path: PathBuf, message: String },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn packaging(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::PackagingError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// The revision lookup could not produce an id.
///
/// Never fatal: the stamper substitutes a fallback revision.
#[derive(Debug, Error)]
#[error("revision unavailable: {0}")]
pub struct RevisionUnavailable(pub String);
