//! Process-level plumbing: stderr redirection and FIFO cleanup on abnormal exit

use std::path::Path;

/// Point the process's stderr at `/dev/null`.
///
/// Silences both our own diagnostics and anything the web engine prints.
#[cfg(unix)]
pub fn silence_stderr() {
    use std::os::unix::io::AsRawFd;

    match std::fs::OpenOptions::new().write(true).open("/dev/null") {
        Ok(null) => {
            // SAFETY: both descriptors are valid; dup2 leaves `null` untouched.
            unsafe {
                libc::dup2(null.as_raw_fd(), libc::STDERR_FILENO);
            }
        }
        Err(e) => eprintln!("Failed to open /dev/null: {}", e),
    }
}

#[cfg(not(unix))]
pub fn silence_stderr() {}

#[cfg(unix)]
mod cleanup {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;
    use std::sync::OnceLock;

    static PIPE_PATH: OnceLock<CString> = OnceLock::new();

    pub fn register(path: &Path) -> bool {
        match CString::new(path.as_os_str().as_bytes()) {
            Ok(c_path) => PIPE_PATH.set(c_path).is_ok(),
            Err(_) => false,
        }
    }

    /// Async-signal-safe: an atomic load and `unlink(2)`.
    pub fn remove_registered() {
        if let Some(path) = PIPE_PATH.get() {
            // SAFETY: path is a valid NUL-terminated string that lives forever.
            unsafe {
                libc::unlink(path.as_ptr());
            }
        }
    }

    extern "C" fn handle_signal(signal: libc::c_int) {
        remove_registered();
        // SAFETY: restoring the default action and re-raising is the standard
        // way to terminate with the signal's own exit status.
        unsafe {
            libc::signal(signal, libc::SIG_DFL);
            libc::raise(signal);
        }
    }

    pub fn install_signal_handlers() {
        let handler = handle_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        for signal in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
            // SAFETY: handle_signal only performs async-signal-safe work.
            unsafe {
                libc::signal(signal, handler);
            }
        }
    }
}

/// Remove the FIFO at `path` if the process dies from a panic or from
/// SIGINT, SIGTERM or SIGHUP. The normal exit path releases it through the
/// dispatcher.
#[cfg(unix)]
pub fn install_cleanup_handlers(path: &Path) {
    if !cleanup::register(path) {
        tracing::warn!(path = %path.display(), "Abnormal-exit cleanup not installed");
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        cleanup::remove_registered();
        previous(info);
    }));

    cleanup::install_signal_handlers();
}

#[cfg(not(unix))]
pub fn install_cleanup_handlers(_path: &Path) {}

#[cfg(all(test, unix))]
mod tests {
    use super::cleanup;

    #[test]
    fn test_registered_path_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.fifo");
        std::fs::write(&path, b"").unwrap();

        assert!(cleanup::register(&path));
        cleanup::remove_registered();
        assert!(!path.exists());

        // Only the first registration counts.
        assert!(!cleanup::register(&dir.path().join("other.fifo")));
    }
}
