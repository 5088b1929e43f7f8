//! Merge the worker entry and its imports into one module.
//!
//! # Architecture
//!
//! ```text
//! build_bundle()
//!     │
//!     ├── read icon ──► ConstantTable (pages + icon + version)
//!     │
//!     └── Compiler::compile(CompileRequest) ──► single ES module text
//!             │
//!             └── EsbuildCompiler (default back-end)
//! ```
//!
//! The bundler is only reached through the [`Compiler`] trait; any back-end
//! that turns a request into one module's source text can replace esbuild.

mod constants;
mod esbuild;

pub use constants::ConstantTable;
pub use esbuild::EsbuildCompiler;

use crate::{assets::SubstitutionResult, config::PackConfig, error::BuildError, log};
use std::{fs, path::PathBuf};

/// Output module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// A single ECMAScript module.
    Esm,
}

impl ModuleFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Esm => "esm",
        }
    }
}

/// Everything a back-end needs to produce the worker module.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub entry: PathBuf,
    pub bundle: bool,
    /// Imports left unresolved for the runtime.
    pub external: Vec<String>,
    pub format: ModuleFormat,
    pub minify: bool,
    pub platform: String,
    pub target: String,
    pub constants: ConstantTable,
}

impl CompileRequest {
    /// Request for the configured entry: bundled, unminified, one ES module.
    pub fn new(config: &PackConfig, constants: ConstantTable) -> Self {
        Self {
            entry: config.build.entry.clone(),
            bundle: true,
            external: config.bundle.external.clone(),
            format: ModuleFormat::Esm,
            minify: false,
            platform: config.bundle.platform.clone(),
            target: config.bundle.target.clone(),
            constants,
        }
    }
}

/// Compile a module graph with constants into source text.
pub trait Compiler {
    /// Returns the emitted module, or `BuildError::CompileError` carrying the
    /// bundler's diagnostics.
    fn compile(&self, request: &CompileRequest) -> Result<String, BuildError>;
}

/// Build the constant table for `pages` and run the compiler once.
pub fn build_bundle(
    compiler: &dyn Compiler,
    config: &PackConfig,
    pages: &[SubstitutionResult],
) -> Result<String, BuildError> {
    for name in ConstantTable::unassigned(pages) {
        log!("warn"; "page `{name}` has no constant, skipped");
    }

    let icon_path = &config.build.icon;
    let icon = fs::read(icon_path).map_err(|err| BuildError::io(icon_path, err))?;

    let constants = ConstantTable::new(pages, &icon, config.version());
    let request = CompileRequest::new(config, constants);

    compiler.compile(&request)
}
