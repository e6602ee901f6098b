//! Error types for kiosk

use thiserror::Error;

/// Result type alias for kiosk operations
pub type KioskResult<T> = Result<T, KioskError>;

/// Main error type for kiosk
#[derive(Error, Debug)]
pub enum KioskError {
    #[error("Named pipe error: {0}")]
    Pipe(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("WebView error: {0}")]
    WebView(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl KioskError {
    /// Create a new named pipe error
    pub fn pipe(msg: impl Into<String>) -> Self {
        Self::Pipe(msg.into())
    }

    /// Create a new window error
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }

    /// Create a new WebView error
    pub fn webview(msg: impl Into<String>) -> Self {
        Self::WebView(msg.into())
    }
}
