//! Worker build orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_worker()
//!     │
//!     ├── assets   TemplateStore::discover/load ──► substitute + encode
//!     │
//!     ├── bundle   ConstantTable ──► Compiler::compile
//!     │
//!     ├── stamp    banner (time, revision, version) + @ts-nocheck
//!     │
//!     └── package  dist/worker.js, then dist/worker.zip
//! ```
//!
//! Stages run one after another, each consuming only the previous stage's
//! output. The first failure aborts the build; nothing after it runs.

use crate::{
    assets::{self, SubstitutionResult, TemplateStore},
    bundle::{Compiler, build_bundle},
    config::PackConfig,
    error::BuildError,
    log, log_ok,
    package::{PackagedOutput, Packager},
    stamp::{BuildArtifact, RevisionProvider},
};
use chrono::Utc;

/// Run one stage and report it as done.
fn stage<T>(
    module: &str,
    done: &str,
    run: impl FnOnce() -> Result<T, BuildError>,
) -> Result<T, BuildError> {
    let value = run()?;
    log_ok!(module; "{done}");
    Ok(value)
}

/// Build the worker and write both artifacts.
pub fn build_worker(
    config: &PackConfig,
    compiler: &dyn Compiler,
    revisions: &dyn RevisionProvider,
) -> Result<PackagedOutput, BuildError> {
    let version = config.version();

    let pages = stage("assets", "assets bundled", || process_pages(config, version))?;

    let source = stage("bundle", "worker built", || {
        build_bundle(compiler, config, &pages)
    })?;

    let artifact = BuildArtifact::new(source, Utc::now(), revisions, version);
    log!("stamp"; "commit {} at {}", artifact.revision, artifact.timestamp);
    let stamped = artifact.render();

    let packager = Packager::new(config);
    let raw_bytes = stage("package", "raw script written", || {
        packager.prepare()?;
        packager.write_raw(&stamped)
    })?;
    log!("package"; "{}", packager.raw_path().display());

    let archive_bytes = stage("package", "archive written", || {
        packager.write_archive(&stamped)
    })?;
    log!("package"; "{}", packager.archive_path().display());

    log_ok!("build"; "done");
    Ok(PackagedOutput {
        raw_bytes,
        archive_bytes,
    })
}

/// Load, substitute and encode every discovered page, in discovery order.
fn process_pages(config: &PackConfig, version: &str) -> Result<Vec<SubstitutionResult>, BuildError> {
    let store = TemplateStore::new(&config.build.assets);
    let names = store.discover()?;
    log!("assets"; "found {} pages: {}", names.len(), names.join(", "));

    names
        .iter()
        .map(|name| {
            let page = store.load(name)?;
            Ok(assets::process(&page, version))
        })
        .collect()
}
