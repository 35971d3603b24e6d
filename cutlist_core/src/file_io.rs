//! # File I/O Module
//!
//! On-disk plumbing for [`DirectoryStore`](crate::store::DirectoryStore):
//! - **Atomic writes**: write to `.tmp`, sync, rename over the target
//! - **File locking**: one writer per stored document
//! - **Version validation**: stored documents must match the schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use cutlist_core::file_io::{read_optional, write_atomic, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("cutlist.projects.json");
//!
//! let lock = FileLock::acquire(path, "workshop")?;
//! write_atomic(path, r#"{"version":"0.1.0","projects":[]}"#)?;
//! drop(lock);
//!
//! assert!(read_optional(path)?.is_some());
//! # Ok::<(), cutlist_core::errors::CutlistError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CutlistError, CutlistResult};
use crate::project::SCHEMA_VERSION;

/// Lock file metadata stored next to the locked document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (user or application instance)
    pub owner: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(owner: impl Into<String>) -> Self {
        LockInfo {
            owner: owner.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use lock::FileLock;

#[cfg(not(target_arch = "wasm32"))]
mod lock {
    use std::fs::{self, File, OpenOptions};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use fs2::FileExt;

    use super::{is_lock_stale, lock_path_for, read_lock_info, LockInfo};
    use crate::errors::{CutlistError, CutlistResult};

    /// Exclusive lock on a stored document, released on drop.
    ///
    /// Holds an OS-level lock (fs2) on a `.lock` file that also records
    /// who took it, so a second writer can report the holder.
    pub struct FileLock {
        path: PathBuf,
        lock_path: PathBuf,
        _lock_file: File,
        pub info: LockInfo,
    }

    impl FileLock {
        /// Acquire the lock for `path`.
        ///
        /// Returns [`CutlistError::FileLocked`] when a live lock exists.
        /// Stale locks (dead process, or older than a day) are taken over.
        pub fn acquire(path: &Path, owner: impl Into<String>) -> CutlistResult<Self> {
            let lock_path = lock_path_for(path);
            let info = LockInfo::new(owner);

            if let Some(existing) = FileLock::check(path) {
                return Err(CutlistError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.owner, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }

            let mut lock_file = OpenOptions::new()
                .write(true)
                .read(true)
                .create(true)
                .truncate(true)
                .open(&lock_path)
                .map_err(|e| CutlistError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

            lock_file.try_lock_exclusive().map_err(|_| {
                CutlistError::file_locked(path.display().to_string(), "another process", "unknown")
            })?;

            let lock_json = serde_json::to_string_pretty(&info).map_err(CutlistError::serialization)?;
            lock_file
                .write_all(lock_json.as_bytes())
                .and_then(|_| lock_file.sync_all())
                .map_err(|e| CutlistError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

            Ok(FileLock {
                path: path.to_path_buf(),
                lock_path,
                _lock_file: lock_file,
                info,
            })
        }

        /// Current holder of the lock for `path`, if any
        pub fn check(path: &Path) -> Option<LockInfo> {
            let lock_path = lock_path_for(path);
            if !lock_path.exists() {
                return None;
            }
            read_lock_info(&lock_path).ok().filter(|info| !is_lock_stale(info))
        }

        /// The locked document
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for FileLock {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

/// Lock file path for a document: `x.json` becomes `x.json.lock`
pub(crate) fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CutlistResult<LockInfo> {
    let contents = fs::read_to_string(lock_path)
        .map_err(|e| CutlistError::file_error("read lock", lock_path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(CutlistError::serialization)
}

/// A lock is stale when its process is gone (same machine) or it is more
/// than 24 hours old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

/// Write `contents` to `path` atomically.
///
/// Writes `<path>.tmp`, syncs it, then renames it over `path`, so an
/// interrupted write never leaves a half-written document behind.
pub fn write_atomic(path: &Path, contents: &str) -> CutlistResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CutlistError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CutlistError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CutlistError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Read a document, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> CutlistResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CutlistError::file_error("read", path.display().to_string(), e.to_string())),
    }
}

/// Delete a document. A missing file is not an error.
pub fn remove_if_exists(path: &Path) -> CutlistResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CutlistError::file_error("remove", path.display().to_string(), e.to_string())),
    }
}

/// Check that a stored document's version is compatible with [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a newer minor
/// version is also rejected.
pub fn validate_version(file_version: &str) -> CutlistResult<()> {
    let mismatch = || CutlistError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/data/cutlist.projects.json"));
        assert_eq!(lock_path, Path::new("/data/cutlist.projects.json.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("workshop");
        assert_eq!(info.owner, "workshop");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        write_atomic(&path, "{}").unwrap();
        write_atomic(&path, "{\"a\":1}").unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_read_optional_and_remove() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert_eq!(read_optional(&path).unwrap(), None);
        assert!(remove_if_exists(&path).is_ok());

        write_atomic(&path, "[]").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[]"));
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let lock = FileLock::acquire(&path, "workshop").unwrap();
        assert_eq!(lock.info.owner, "workshop");
        assert_eq!(lock.path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_stale_lock_by_age() {
        let mut info = LockInfo::new("workshop");
        info.machine = "some-other-machine".to_string();
        assert!(!is_lock_stale(&info));

        info.locked_at = Utc::now() - chrono::Duration::hours(25);
        assert!(is_lock_stale(&info));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
