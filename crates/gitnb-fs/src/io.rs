//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Path of the temporary sibling used by [`write_atomic`] for `path`.
///
/// Lives in the same directory as the target so the final rename never
/// crosses a filesystem boundary.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a failure at any point leaves the
/// previous file untouched. The temp file is removed if anything after
/// its creation fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(&native_path);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = (|| {
        temp_file
            .lock_exclusive()
            .map_err(|_| Error::LockFailed {
                path: native_path.clone(),
            })?;
        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;
        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;
        temp_file.unlock().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;
        fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))
    })();

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written?;

    tracing::debug!(path = %path, bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Write text only when it differs from what is already on disk.
///
/// Returns `true` when the file was (re)written. An unchanged file keeps
/// its timestamps.
pub fn write_text_if_changed(path: &NormalizedPath, content: &str) -> Result<bool> {
    match read_bytes(path) {
        Ok(existing) if existing == content.as_bytes() => Ok(false),
        Ok(_) | Err(Error::NotFound { .. }) => {
            write_text(path, content)?;
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/a/b/notebooks"));
        assert_eq!(temp.parent(), Some(Path::new("/a/b")));
        let name = temp.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".notebooks."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn write_if_changed_skips_identical_content() {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("out.txt"));

        assert!(write_text_if_changed(&path, "same").unwrap());
        assert!(!write_text_if_changed(&path, "same").unwrap());
        assert!(write_text_if_changed(&path, "different").unwrap());
        assert_eq!(read_text(&path).unwrap(), "different");
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("missing.txt"));
        assert!(matches!(read_text(&path), Err(Error::NotFound { .. })));
    }
}
