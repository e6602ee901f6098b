//! Browser session and command dispatch
//!
//! [`BrowserSession`] is the window/page state owned by the GUI thread.
//! [`Dispatcher`] is the only thing that mutates it: one command at a time,
//! always on the GUI thread.

use crate::command::Command;
use crate::pipe::NamedPipe;
use kiosk_core::types::{Frame, Position, Size};
use kiosk_core::KioskResult;

/// The toolkit operations the session needs from a window + web view pair.
///
/// Not `Send`: toolkit handles live on the GUI thread.
pub trait BrowserSurface {
    /// Load a network URL
    fn load_url(&self, url: &str) -> KioskResult<()>;

    /// Load a local file named by a `file://` URL, with read access scoped to it
    fn load_local_file(&self, url: &str) -> KioskResult<()>;

    /// Load HTML content directly
    fn load_html(&self, html: &str) -> KioskResult<()>;

    /// Move the window
    fn set_position(&self, position: Position);

    /// Resize the window
    fn set_size(&self, size: Size);
}

/// Live window and page state
pub struct BrowserSession<S: BrowserSurface> {
    surface: S,
    position: Position,
    size: Size,
    always_on_top: bool,
    current_page: Option<String>,
}

impl<S: BrowserSurface> BrowserSession<S> {
    /// Wrap a surface that was created at `frame`.
    pub fn new(surface: S, frame: Frame, always_on_top: bool) -> Self {
        Self {
            surface,
            position: frame.position,
            size: frame.size,
            always_on_top,
            current_page: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn frame(&self) -> Frame {
        Frame {
            position: self.position,
            size: self.size,
        }
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    /// Last URL successfully handed to the web engine
    pub fn current_page(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    /// Show the startup page: `url` when it names a loadable page, otherwise
    /// `fallback_html`.
    pub fn open_initial(&mut self, url: Option<&str>, fallback_html: &str) {
        match url.and_then(crate::command::parse) {
            Some(Command::Navigate(url)) => self.navigate(&url),
            Some(Command::LoadLocalFile(url)) => self.load_local_file(&url),
            other => {
                if let Some(command) = other {
                    log::debug!("Startup URL is not loadable: {:?}", command);
                }
                if let Err(e) = self.surface.load_html(fallback_html) {
                    log::warn!("Failed to load instructions page: {}", e);
                }
            }
        }
    }

    pub fn navigate(&mut self, url: &str) {
        match self.surface.load_url(url) {
            Ok(()) => {
                log::info!("Navigating to {}", url);
                self.current_page = Some(url.to_string());
            }
            Err(e) => log::warn!("Failed to navigate to {}: {}", url, e),
        }
    }

    pub fn load_local_file(&mut self, url: &str) {
        match self.surface.load_local_file(url) {
            Ok(()) => {
                log::info!("Loading local file {}", url);
                self.current_page = Some(url.to_string());
            }
            Err(e) => log::warn!("Failed to load {}: {}", url, e),
        }
    }

    /// Move the window; size is unchanged.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.surface.set_position(position);
    }

    /// Resize the window; position is unchanged.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.surface.set_size(size);
    }
}

/// What happened to a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    Ignored,
    /// Terminate the event loop now. Returned at most once.
    Exit,
}

/// Applies commands to the session, in arrival order, on the GUI thread
pub struct Dispatcher<S: BrowserSurface> {
    session: BrowserSession<S>,
    pipe: Option<NamedPipe>,
    debug: bool,
    exited: bool,
}

impl<S: BrowserSurface> Dispatcher<S> {
    /// `pipe` is released when an `Exit` command is applied.
    pub fn new(session: BrowserSession<S>, pipe: Option<NamedPipe>, debug: bool) -> Self {
        Self {
            session,
            pipe,
            debug,
            exited: false,
        }
    }

    pub fn session(&self) -> &BrowserSession<S> {
        &self.session
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn dispatch(&mut self, command: Command) -> Dispatch {
        if self.exited {
            log::debug!("Ignoring {:?} after exit", command);
            return Dispatch::Ignored;
        }

        match command {
            Command::Navigate(url) => self.session.navigate(&url),
            Command::LoadLocalFile(url) => self.session.load_local_file(&url),
            Command::SetPosition { x, y } => self.session.set_position(Position::new(x, y)),
            Command::SetSize { width, height } => {
                self.session.set_size(Size::new(width, height))
            }
            Command::Exit => {
                self.shutdown();
                return Dispatch::Exit;
            }
            Command::Invalid(text) => {
                if self.debug {
                    log::warn!("Ignoring invalid command: {}", text);
                }
                return Dispatch::Ignored;
            }
        }

        Dispatch::Applied
    }

    /// Release scoped resources. Runs once, on the first `Exit`.
    pub fn shutdown(&mut self) {
        if self.exited {
            return;
        }
        self.exited = true;
        log::info!("Shutting down");

        if let Some(pipe) = self.pipe.as_mut() {
            pipe.release();
        }
    }
}
