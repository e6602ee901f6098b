//! The borderless window and its `BrowserSurface` adapter

use crate::webview::{self, WebView};
use kiosk_core::types::{Frame, Position, Size};
use kiosk_core::{KioskError, KioskResult};
use kiosk_shell::BrowserSurface;
use tao::dpi::{LogicalPosition, LogicalSize};
use tao::event_loop::EventLoopWindowTarget;
use tao::window::{Window, WindowBuilder};
use tracing::warn;

/// Bounds of the primary monitor in logical coordinates
pub fn screen_frame<T>(target: &EventLoopWindowTarget<T>) -> Option<Frame> {
    let monitor = target
        .primary_monitor()
        .or_else(|| target.available_monitors().next())?;
    let scale = monitor.scale_factor();
    let position: LogicalPosition<f64> = monitor.position().to_logical(scale);
    let size: LogicalSize<f64> = monitor.size().to_logical(scale);

    Some(Frame::new(position.x, position.y, size.width, size.height))
}

/// Create the undecorated main window at `frame`.
pub fn build_window<T>(
    target: &EventLoopWindowTarget<T>,
    frame: Frame,
    always_on_top: bool,
) -> KioskResult<Window> {
    WindowBuilder::new()
        .with_title("kiosk")
        .with_decorations(false)
        .with_always_on_top(always_on_top)
        .with_position(LogicalPosition::new(frame.position.x, frame.position.y))
        .with_inner_size(LogicalSize::new(frame.size.width, frame.size.height))
        .with_visible(true)
        .build(target)
        .map_err(|e| KioskError::window(e.to_string()))
}

/// A tao window and the wry web view filling it.
///
/// Lives on the event loop thread only.
pub struct WindowSurface {
    window: Window,
    webview: WebView,
}

impl WindowSurface {
    pub fn new(window: Window, webview: WebView) -> Self {
        Self { window, webview }
    }
}

impl BrowserSurface for WindowSurface {
    fn load_url(&self, url: &str) -> KioskResult<()> {
        self.webview
            .load_url(url)
            .map_err(|e| KioskError::webview(e.to_string()))
    }

    fn load_local_file(&self, url: &str) -> KioskResult<()> {
        // Missing files still go to the engine, which shows its own error page.
        let path = webview::file_url_to_path(url)?;
        if !path.exists() {
            warn!(path = %path.display(), "Local file does not exist");
        }
        self.load_url(url)
    }

    fn load_html(&self, html: &str) -> KioskResult<()> {
        self.webview
            .load_html(html)
            .map_err(|e| KioskError::webview(e.to_string()))
    }

    fn set_position(&self, position: Position) {
        self.window
            .set_outer_position(LogicalPosition::new(position.x, position.y));
    }

    fn set_size(&self, size: Size) {
        self.window
            .set_inner_size(LogicalSize::new(size.width, size.height));
    }
}
