//! Line-producing input sources
//!
//! The console and the named pipe each run a blocking read loop on their own
//! thread. Every complete line is parsed and the resulting command is handed
//! to a [`CommandSink`], which must not block on the GUI thread.

use crate::command::{parse, Command};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Back-off between reads while the named pipe has no data
pub const PIPE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Longest named-pipe line kept, newline excluded. Longer lines are dropped.
pub const MAX_PIPE_LINE: usize = 64 * 1024;

/// Where a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Console,
    Pipe,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Console => "console",
            InputKind::Pipe => "pipe",
        }
    }
}

/// Receiving end of the cross-thread handoff
pub trait CommandSink: Send + 'static {
    /// Hand a command to the dispatching side. Returns `false` once that side
    /// is gone; the source then stops reading.
    fn submit(&self, source: InputKind, command: Command) -> bool;
}

impl CommandSink for crossbeam_channel::Sender<(InputKind, Command)> {
    fn submit(&self, source: InputKind, command: Command) -> bool {
        self.send((source, command)).is_ok()
    }
}

fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Parse one raw line and forward the command, if any.
fn forward_line<K: CommandSink + ?Sized>(line: &str, source: InputKind, sink: &K) -> bool {
    match parse(line) {
        Some(command) => {
            log::trace!("{} -> {:?}", source.as_str(), command);
            sink.submit(source, command)
        }
        None => true,
    }
}

/// Read the console until end-of-stream, then submit [`Command::Exit`].
pub fn run_console<R: BufRead, K: CommandSink + ?Sized>(mut reader: R, sink: &K) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if !forward_line(&decode_line(&buf), InputKind::Console, sink) {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("Console read failed: {}", e);
                break;
            }
        }
    }

    log::info!("Console input closed");
    sink.submit(InputKind::Console, Command::Exit);
}

/// Start the console source on its own thread.
pub fn spawn_console_source<K: CommandSink>(sink: K) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("kiosk-console".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            run_console(stdin.lock(), &sink);
        })
}

/// Read a named pipe forever.
///
/// "No data" is not terminal for a FIFO: when a read would block or reports
/// end-of-stream the loop sleeps for `poll` and tries again. A partial line is
/// kept until its newline arrives, up to [`MAX_PIPE_LINE`] bytes; anything
/// longer is discarded through its newline. The loop ends when the sink goes
/// away or on an unrecoverable read error.
pub fn run_pipe<R: Read, K: CommandSink + ?Sized>(reader: R, sink: &K, poll: Duration) {
    let mut reader = BufReader::new(reader);
    let mut pending = Vec::new();
    let mut discarding = false;

    loop {
        // pending never exceeds MAX_PIPE_LINE here, so room is at least 1
        let room = (MAX_PIPE_LINE + 1 - pending.len()) as u64;
        let result = reader
            .by_ref()
            .take(room)
            .read_until(b'\n', &mut pending);

        if pending.len() > MAX_PIPE_LINE && !pending.ends_with(b"\n") {
            if !discarding {
                log::debug!("Dropping named pipe line longer than {} bytes", MAX_PIPE_LINE);
            }
            pending.clear();
            discarding = true;
            continue;
        }

        match result {
            Ok(_) if pending.ends_with(b"\n") && discarding => {
                pending.clear();
                discarding = false;
            }
            Ok(_) if pending.ends_with(b"\n") => {
                let keep_going = forward_line(&decode_line(&pending), InputKind::Pipe, sink);
                pending.clear();
                if !keep_going {
                    return;
                }
            }
            // End-of-stream, possibly mid-line
            Ok(_) => thread::sleep(poll),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(poll),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("Named pipe read failed: {}", e);
                return;
            }
        }
    }
}

/// Open a FIFO for reading without waiting for a writer.
///
/// A read-only open blocks until some process opens the write end. Opening
/// read-write makes this process a writer too, so the open returns at once and
/// the pipe never reports a final end-of-stream.
pub fn open_pipe(path: &Path) -> io::Result<File> {
    let mut options = std::fs::OpenOptions::new();
    options.read(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NONBLOCK);
    }

    options.open(path)
}

/// Open the pipe and start its read loop on its own thread.
///
/// Open failures are returned to the caller, which decides whether to run
/// without the pipe.
pub fn spawn_pipe_source<K: CommandSink>(path: &Path, sink: K) -> io::Result<JoinHandle<()>> {
    let file = open_pipe(path)?;
    log::info!("Reading commands from {}", path.display());

    thread::Builder::new()
        .name("kiosk-pipe".to_string())
        .spawn(move || run_pipe(file, &sink, PIPE_POLL_INTERVAL))
}
