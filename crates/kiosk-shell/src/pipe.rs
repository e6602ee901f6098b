//! Named pipe (FIFO) lifetime
//!
//! The FIFO's filesystem entry is owned by a [`NamedPipe`] guard and removed
//! when the guard is released or dropped.

use kiosk_core::{KioskError, KioskResult};
use std::path::{Path, PathBuf};

/// Permission bits for a freshly created FIFO
pub const FIFO_MODE: u32 = 0o644;

/// Guard for a FIFO's filesystem entry
#[derive(Debug)]
pub struct NamedPipe {
    path: PathBuf,
    released: bool,
}

impl NamedPipe {
    /// Create the FIFO at `path`. An existing FIFO is reused; any other kind of
    /// entry is an error and is left untouched.
    #[cfg(unix)]
    pub fn create(path: impl Into<PathBuf>) -> KioskResult<Self> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;
        use std::os::unix::fs::FileTypeExt;

        let path = path.into();
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| KioskError::pipe(format!("path contains a NUL byte: {:?}", path)))?;

        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), FIFO_MODE as libc::mode_t) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::AlreadyExists {
                return Err(KioskError::pipe(format!(
                    "failed to create {}: {}",
                    path.display(),
                    err
                )));
            }
            match std::fs::metadata(&path) {
                Ok(meta) if meta.file_type().is_fifo() => {
                    log::debug!("Reusing existing named pipe {}", path.display());
                }
                Ok(_) => {
                    return Err(KioskError::pipe(format!(
                        "{} exists and is not a named pipe",
                        path.display()
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            log::info!("Created named pipe {}", path.display());
        }

        Ok(Self {
            path,
            released: false,
        })
    }

    #[cfg(not(unix))]
    pub fn create(path: impl Into<PathBuf>) -> KioskResult<Self> {
        let path = path.into();
        Err(KioskError::pipe(format!(
            "named pipes are not supported on this platform: {}",
            path.display()
        )))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Remove the filesystem entry. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => log::info!("Removed named pipe {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for NamedPipe {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    #[test]
    fn test_create_makes_fifo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.fifo");

        let pipe = NamedPipe::create(&path).unwrap();
        let meta = std::fs::metadata(pipe.path()).unwrap();
        assert!(meta.file_type().is_fifo());
        // umask may clear bits but never adds any
        assert_eq!(meta.permissions().mode() & 0o777 & !FIFO_MODE, 0);
    }

    #[test]
    fn test_existing_fifo_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.fifo");

        let mut first = NamedPipe::create(&path).unwrap();
        let second = NamedPipe::create(&path).unwrap();
        assert_eq!(first.path(), second.path());

        first.release();
        assert!(!path.exists());
        drop(second);
    }

    #[test]
    fn test_existing_regular_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "exit\n").unwrap();

        let err = NamedPipe::create(&path).unwrap_err();
        assert!(matches!(err, KioskError::Pipe(_)));

        // No guard was handed out, so nothing may remove the file.
        assert!(path.is_file());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "exit\n");
    }

    #[test]
    fn test_existing_directory_is_refused() {
        let dir = tempfile::tempdir().unwrap();

        assert!(NamedPipe::create(dir.path()).is_err());
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_drop_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.fifo");

        {
            let _pipe = NamedPipe::create(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.fifo");

        let mut pipe = NamedPipe::create(&path).unwrap();
        pipe.release();
        assert!(pipe.is_released());
        pipe.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("cmd.fifo");

        let err = NamedPipe::create(&path).unwrap_err();
        assert!(matches!(err, KioskError::Pipe(_)));
    }
}
