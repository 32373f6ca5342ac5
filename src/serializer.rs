//! Serialization helpers shared by the metadata model and the artifact emitters.
//!
//! JSON artifacts are pretty-printed with a trailing newline, so files are stable
//! under version control and diff cleanly between runs.

use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a value to pretty-printed JSON.
///
/// Field order follows the declaration order of the serialized structs, which keeps the
/// output canonical for a given value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Writes string content to a file.
///
/// Creates the parent directories if they don't exist. An existing file is truncated and
/// rewritten.
///
/// # Errors
///
/// Returns [`Error::WriteError`] naming the file if a directory or the file cannot be
/// written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::WriteError {
            file: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| Error::WriteError {
        file: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
