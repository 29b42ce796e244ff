//! Filesystem access for the analyzers: reading documents and listing the
//! markdown files of a directory. Read-only.

use crate::document::Document;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of command and narrative documents.
pub const MARKDOWN_EXT: &str = "md";

/// Read a document, failing with [`Error::NotFound`] when `path` is absent.
pub fn read_document(path: &Path) -> Result<Document> {
    require(path)?;
    read_text(path).map(Document::parse)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Fail with [`Error::NotFound`] unless `path` exists.
pub fn require(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// `*.md` files directly inside `dir`, sorted.
pub fn list_markdown(dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(dir, &format!("*.{MARKDOWN_EXT}"))
}

/// `*.md` files anywhere below `dir`, sorted.
pub fn list_markdown_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(dir, &format!("**/*.{MARKDOWN_EXT}"))
}

/// Regular files under `dir` matching the relative glob `pattern`. The
/// directory part is escaped so roots containing glob metacharacters work.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", root.trim_end_matches('/'), pattern);
    let mut files: Vec<PathBuf> = glob::glob(&full)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), "skipping unreadable entry: {}", e.error());
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
