//! Template pages: discovery, loading, substitution and encoding.
//!
//! ```text
//! src/assets/
//!   panel/   index.html style.css script.js
//!   login/   index.html style.css script.js
//!   error/   index.html
//! ```
//!
//! Each directory holding an `index.html` is one page. Every page except
//! [`ERROR_PAGE`] must pair its html with a stylesheet and a script, which
//! are inlined at the `__STYLE__` and `__SCRIPT__` placeholders.

mod process;
mod store;

pub use process::{SubstitutionResult, encode, process};
pub use store::TemplateStore;

/// The only page that carries no style/script companions.
pub const ERROR_PAGE: &str = "error";

pub const INDEX_FILE: &str = "index.html";
pub const STYLE_FILE: &str = "style.css";
pub const SCRIPT_FILE: &str = "script.js";

/// Placeholder tokens recognized inside page templates.
pub mod tokens {
    pub const VERSION: &str = "__VERSION__";
    pub const STYLE: &str = "__STYLE__";
    pub const SCRIPT: &str = "__SCRIPT__";
}

/// Raw text of one page as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePage {
    /// Directory path relative to the template root, `/`-separated.
    pub name: String,
    pub raw_html: String,
    pub style_text: Option<String>,
    pub script_text: Option<String>,
}

impl TemplatePage {
    pub fn is_error_page(&self) -> bool {
        self.name == ERROR_PAGE
    }
}
