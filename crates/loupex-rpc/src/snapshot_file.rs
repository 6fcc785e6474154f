//! Snapshot persistence as pretty-printed JSON
//!
//! The previous snapshot is always passed to `diff` explicitly; these
//! helpers only move it to and from disk.

use crate::errors::{io_error, Result};
use loupex_core::DiamondSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Write `snapshot` to `path`, replacing any existing file
///
/// The JSON is written to a sibling temporary file and renamed into place,
/// so readers never observe a partial snapshot. The temporary file is
/// removed again if the rename fails.
///
/// # Errors
///
/// `Serialization` or `Io`.
pub fn save(path: &Path, snapshot: &DiamondSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
    }

    let staging = staging_path(path);
    fs::write(&staging, json).map_err(|e| io_error("write", &staging, e))?;
    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(io_error("rename", path, err));
    }

    tracing::debug!(
        component = module_path!(),
        op = "snapshot_save",
        path = %path.display(),
        facet_count = snapshot.facets.len(),
    );
    Ok(())
}

/// Read a snapshot written by [`save`]
///
/// # Errors
///
/// `Io` if the file cannot be read, `Serialization` if it is not a snapshot
/// or lists the same facet twice.
pub fn load(path: &Path) -> Result<DiamondSnapshot> {
    let text = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Like [`load`], but a missing file is `None` (first run)
///
/// # Errors
///
/// Same as [`load`] for anything but a missing file.
pub fn load_optional(path: &Path) -> Result<Option<DiamondSnapshot>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error("read", path, err)),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
