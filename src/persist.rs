//! Disk I/O helpers: load from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On FAT32 or
//! network shares there are no hard guarantees.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::serializer::Serializer;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Reads and deserializes the file at `path`. Returns no records if the file
/// is missing, empty, or whitespace only (not an error).
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Vec<Record>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serializer.deserialize(&bytes)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. With `sync` the
/// temp file is fsynced before the rename and the parent directory after it,
/// so a crash leaves either the old snapshot or the new one.
pub fn atomic_write(path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    if let Err(err) = write_and_rename(&tmp, path, bytes, sync) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    if sync {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Directory fsync is unsupported on some platforms.
            if let Ok(d) = File::open(dir) {
                let _ = d.sync_all();
            }
        }
    }
    Ok(())
}

fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    drop(file);
    fs::rename(tmp, path)?;
    Ok(())
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).map_err(Error::from),
        _ => Ok(()),
    }
}
