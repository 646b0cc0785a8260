//! Atomic file replacement.
//!
//! Content is written to a temporary file in the target's directory, synced,
//! and renamed over the target. Readers see either the old content or the
//! new content, never a partial write.
//!
//! # Important Notes
//!
//! - Missing parent directories are NOT created; writing to a location whose
//!   directory does not exist fails.
//! - On crash, a temporary file named `.{filename}.{random}.tmp` may remain.
//! - `rename` is atomic only within one filesystem, which holds here because
//!   the temporary file lives next to the target.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically replace the file at `path` with `content`.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = generate_temp_path(path)?;

    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;

    sync_parent_dir(path);
    Ok(())
}

/// Persist the directory entry of `path`. Best effort.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

/// Temporary sibling path of `target`.
///
/// A random suffix keeps concurrent writers of the same target apart.
fn generate_temp_path(target: &Path) -> io::Result<PathBuf> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file path '{}'", target.display()),
            )
        })?;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Ok(parent.join(format!(".{}.{}.tmp", filename, &suffix[..12])))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if written.is_err() {
        let _ = fs::remove_file(path);
    }
    written
}
