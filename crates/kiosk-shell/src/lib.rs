//! Kiosk shell - runtime command interpreter and dispatch
//!
//! Lines arrive from the console and from an optional named pipe, each on its
//! own thread. They are parsed into [`Command`]s and handed to the GUI thread
//! through a [`CommandSink`], where a single [`Dispatcher`] applies them to the
//! [`BrowserSession`].

pub mod command;
pub mod input;
pub mod pipe;
pub mod session;

pub use command::{parse, Command};
pub use input::{
    spawn_console_source, spawn_pipe_source, CommandSink, InputKind, MAX_PIPE_LINE,
    PIPE_POLL_INTERVAL,
};
pub use pipe::NamedPipe;
pub use session::{BrowserSession, BrowserSurface, Dispatch, Dispatcher};
