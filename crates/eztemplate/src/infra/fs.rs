//! Filesystem access helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Overwrite `path` with `contents`.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
