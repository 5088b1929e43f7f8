use super::{ERROR_PAGE, INDEX_FILE, SCRIPT_FILE, STYLE_FILE, TemplatePage};
use crate::error::BuildError;
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Read-only view over the template root.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Identifiers of every directory below the root that holds an `index.html`.
    ///
    /// The walk is sorted by file name, so the order is stable across runs.
    /// Symlinks are followed. An `index.html` directly in the root names no
    /// page and is skipped. Any directory that cannot be read fails the walk.
    pub fn discover(&self) -> Result<Vec<String>, BuildError> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|err| walk_error(&self.root, err))?;
            if !entry.file_type().is_file() || entry.file_name() != INDEX_FILE {
                continue;
            }

            let id = entry
                .path()
                .parent()
                .and_then(|dir| dir.strip_prefix(&self.root).ok())
                .and_then(page_id);
            if let Some(id) = id {
                pages.push(id);
            }
        }

        Ok(pages)
    }

    /// Read the raw assets of one page.
    ///
    /// The error page only reads its html; every other page also needs
    /// `style.css` and `script.js`.
    pub fn load(&self, name: &str) -> Result<TemplatePage, BuildError> {
        let dir = self.root.join(name);

        let index_path = dir.join(INDEX_FILE);
        let raw_html =
            fs::read_to_string(&index_path).map_err(|err| BuildError::io(&index_path, err))?;

        if name == ERROR_PAGE {
            return Ok(TemplatePage {
                name: name.to_owned(),
                raw_html,
                style_text: None,
                script_text: None,
            });
        }

        Ok(TemplatePage {
            name: name.to_owned(),
            raw_html,
            style_text: Some(read_companion(name, &dir.join(STYLE_FILE))?),
            script_text: Some(read_companion(name, &dir.join(SCRIPT_FILE))?),
        })
    }
}

fn read_companion(page: &str, path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => BuildError::AssetMissing {
            page: page.to_owned(),
            path: path.to_path_buf(),
        },
        _ => BuildError::io(path, err),
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> BuildError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop"));
    BuildError::io(path, source)
}

/// `/`-joined relative directory, `None` for the root itself.
fn page_id(dir: &Path) -> Option<String> {
    let parts: Vec<_> = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}
