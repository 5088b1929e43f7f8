//! Build metadata banner prepended to the bundled worker.
//!
//! ```text
//! // Build: 2026-10-16T08:30:00.000Z | Commit: 3f2a9c1 | Version: 1.2.3
//! // @ts-nocheck
//! <bundled module, untouched>
//! ```

use crate::{error::RevisionUnavailable, log};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::PathBuf;

/// Revision recorded when the lookup fails.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Disables type checking of the emitted file in editors and `tsc`.
const NO_CHECK_DIRECTIVE: &str = "// @ts-nocheck";

/// Best-effort source of the current revision id.
pub trait RevisionProvider {
    fn revision(&self) -> Result<String, RevisionUnavailable>;
}

/// Abbreviated `HEAD` id of the repository enclosing `root`.
#[derive(Debug, Clone)]
pub struct GitRevision {
    root: PathBuf,
}

impl GitRevision {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RevisionProvider for GitRevision {
    fn revision(&self) -> Result<String, RevisionUnavailable> {
        let repo = gix::discover(&self.root).map_err(|e| RevisionUnavailable(e.to_string()))?;
        let head = repo
            .head_id()
            .map_err(|e| RevisionUnavailable(e.to_string()))?;
        Ok(head.shorten_or_id().to_string())
    }
}

/// The bundled source together with the metadata stamped onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub source_code: String,
    /// ISO-8601, UTC, millisecond precision.
    pub timestamp: String,
    pub revision: String,
    pub version: String,
}

impl BuildArtifact {
    /// Collect the metadata for `source_code`.
    ///
    /// A failed revision lookup is absorbed here and recorded as
    /// [`UNKNOWN_REVISION`].
    pub fn new(
        source_code: String,
        at: DateTime<Utc>,
        revisions: &dyn RevisionProvider,
        version: &str,
    ) -> Self {
        let revision = revisions.revision().unwrap_or_else(|err| {
            log!("git"; "{err}, recording `{UNKNOWN_REVISION}`");
            UNKNOWN_REVISION.to_owned()
        });

        Self {
            source_code,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            revision,
            version: version.to_owned(),
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "// Build: {} | Commit: {} | Version: {}",
            self.timestamp, self.revision, self.version
        )
    }

    /// Banner, type-check directive, then the source verbatim.
    pub fn render(&self) -> String {
        format!(
            "{}\n{NO_CHECK_DIRECTIVE}\n{}",
            self.banner(),
            self.source_code
        )
    }
}
