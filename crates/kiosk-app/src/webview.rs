//! WebView construction and URL helpers
//!
//! The page is a single wry web view filling the window. On Linux wry needs a
//! GTK container, so the view is packed into tao's default vbox; everywhere
//! else it is built directly on the window.

use kiosk_core::{KioskError, KioskResult};
use std::path::PathBuf;
use tao::window::Window;
use url::Url;

// Re-export WRY types for convenience
pub use wry::WebView;

/// Build the web view that fills `window`.
pub fn build_webview(window: &Window) -> KioskResult<WebView> {
    let builder = wry::WebViewBuilder::new();

    #[cfg(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    ))]
    let webview = builder.build(window);

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    )))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;

        let vbox = window
            .default_vbox()
            .ok_or_else(|| KioskError::webview("GTK container not available"))?;
        builder.build_gtk(vbox)
    };

    webview.map_err(|e| KioskError::webview(e.to_string()))
}

/// Resolve a `file://` URL to the local path it names.
pub fn file_url_to_path(url: &str) -> KioskResult<PathBuf> {
    let parsed = Url::parse(url)?;
    if parsed.scheme() != "file" {
        return Err(KioskError::webview(format!("not a file URL: {}", url)));
    }
    parsed
        .to_file_path()
        .map_err(|_| KioskError::webview(format!("not a local file URL: {}", url)))
}

/// Get the current WebView engine name
pub fn engine_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "WebView2 (WRY)";

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    return "WKWebView (WRY)";

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios")))]
    return "WebKitGTK (WRY)";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_file_url_to_path() {
        assert_eq!(
            file_url_to_path("file:///tmp/kiosk/index.html").unwrap(),
            PathBuf::from("/tmp/kiosk/index.html")
        );
        assert_eq!(
            file_url_to_path("file:///tmp/my%20page.html").unwrap(),
            PathBuf::from("/tmp/my page.html")
        );
        assert_eq!(
            file_url_to_path("FILE://localhost/tmp/a.html").unwrap(),
            PathBuf::from("/tmp/a.html")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_remote_file_url_is_rejected() {
        assert!(file_url_to_path("file://fileserver/share/a.html").is_err());
    }

    #[test]
    fn test_non_file_urls_are_rejected() {
        assert!(matches!(
            file_url_to_path("https://example.com/a.html"),
            Err(KioskError::WebView(_))
        ));
        assert!(matches!(file_url_to_path("file//broken"), Err(KioskError::Url(_))));
    }

    #[test]
    fn test_engine_name() {
        assert!(engine_name().contains("WRY"));
    }
}
