//! The fixed table of compile-time constants handed to the bundler.

use crate::assets::SubstitutionResult;
use base64::{Engine, engine::general_purpose::STANDARD};

/// Page role → constant name. Roles absent from the templates still get a key.
pub const PAGE_CONSTANTS: [(&str, &str); 4] = [
    ("panel", "__PANEL_HTML_CONTENT__"),
    ("login", "__LOGIN_HTML_CONTENT__"),
    ("error", "__ERROR_HTML_CONTENT__"),
    ("secrets", "__SECRETS_HTML_CONTENT__"),
];

pub const ICON_CONSTANT: &str = "__ICON__";
pub const VERSION_CONSTANT: &str = "__VERSION__";

/// Literal used for a page role with no template.
const EMPTY_LITERAL: &str = "\"\"";

/// Ordered `name → literal source text` mapping over the fixed key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantTable {
    entries: Vec<(&'static str, String)>,
}

impl ConstantTable {
    /// Fill every key: one per page role, then the icon and the version.
    pub fn new(pages: &[SubstitutionResult], icon: &[u8], version: &str) -> Self {
        let mut entries: Vec<(&'static str, String)> = PAGE_CONSTANTS
            .iter()
            .map(|&(role, key)| {
                let literal = pages
                    .iter()
                    .find(|p| p.name == role)
                    .map_or_else(|| EMPTY_LITERAL.to_owned(), |p| p.encoded_html.clone());
                (key, literal)
            })
            .collect();

        entries.push((ICON_CONSTANT, encode_bytes(icon)));
        entries.push((VERSION_CONSTANT, quote(version)));

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Discovered pages that no constant carries.
    pub fn unassigned(pages: &[SubstitutionResult]) -> Vec<&str> {
        pages
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| PAGE_CONSTANTS.iter().all(|(role, _)| role != name))
            .collect()
    }
}

fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

fn encode_bytes(bytes: &[u8]) -> String {
    quote(&STANDARD.encode(bytes))
}
