// File system utilities

use crate::error::{io_context, QuickenvError, QuickenvResult};
use fs_err as fs;
use std::io::Write;
use std::path::Path;

pub fn ensure_directory_exists(path: &Path) -> QuickenvResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| QuickenvError::file_access(path, e))?;
        tracing::debug!(dir = %path.display(), "created directory");
    }
    Ok(())
}

/// Read a text file, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> QuickenvResult<String> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(QuickenvError::file_access(path, e)),
    }
}

/// Replace `path` with `contents` via a temp file in the same directory and a rename,
/// so readers see either the old or the new file, never a truncated one.
/// Symlinked dotfiles are followed so the link itself survives.
pub fn write_atomically(path: &Path, contents: &str) -> QuickenvResult<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let access = |op: &str, e: std::io::Error| {
        QuickenvError::file_access(path, io_context(op, path, e))
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_directory_exists(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| access("create a temp file next to", e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| access("write a temp file for", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| access("sync a temp file for", e))?;
    if let Ok(meta) = fs::metadata(&target) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| QuickenvError::file_access(path, e))?;
    }
    tmp.persist(&target).map_err(|e| access("replace", e.error))?;
    tracing::debug!(file = %path.display(), bytes = contents.len(), "rewrote file");
    Ok(())
}
