//! File system utilities for the scoring pipeline

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Ensures a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
    } else if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {:?}", path),
        )
        .into());
    }
    Ok(())
}

/// Ensures the parent directory of `path` exists
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        | Some(parent) => ensure_dir(parent),
        | None => Ok(()),
    }
}

/// Writes a string to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}
