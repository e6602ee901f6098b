//! Launch configuration
//!
//! Built once from the command line and handed to the app by value. Parsing is
//! deliberately forgiving: a malformed number keeps the default and an unknown
//! argument is reported but does not stop startup.

use crate::types::Frame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Usage text printed by `--help`
pub const USAGE: &str = "\
kiosk - a borderless window around the system web view

USAGE:
    kiosk [OPTIONS]

OPTIONS:
    --url <URL>            Page to open at startup (http://, https:// or file://).
                           Without it a built-in instructions page is shown.
    --width <W>            Window width in logical pixels [default: 800]
    --height <H>           Window height in logical pixels [default: 600]
    --xpos <X>             Window left edge [default: 100]
    --ypos <Y>             Window top edge [default: 100]
    --maximized            Cover the whole primary screen (overrides the frame)
    --always-on-top        Keep the window above all others
    --fifo <PATH>          Also read commands from a named pipe at PATH
                           (created with mode 0644, removed on exit)
    --no-console           Do not read commands from stdin
    --debug                Print diagnostics to stderr
    -h, --help             Print this help and exit

Single-dash spellings (-url, -width, -alwaysOnTop, -fifoPath, ...) are accepted too.

RUNTIME COMMANDS (one per line, on stdin or the named pipe):
    http://... | https://...   Navigate to the URL
    file://...                 Load a local file
    setpos <x> <y>             Move the window
    setsize <w> <h>            Resize the window
    exit                       Quit (end of stdin quits as well,
                               unless --no-console is given)

Keywords are case-insensitive. Anything else is ignored.
";

/// Immutable startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Initial page; `None` shows the instructions page
    pub url: Option<String>,

    /// Initial window frame
    pub frame: Frame,

    /// Replace the frame with the primary screen bounds
    pub maximized: bool,

    /// Keep the window above all others
    pub always_on_top: bool,

    /// Named pipe to read commands from
    pub fifo_path: Option<PathBuf>,

    /// Read commands from stdin
    pub console: bool,

    /// Print diagnostics
    pub debug: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            url: None,
            frame: Frame::default(),
            maximized: false,
            always_on_top: false,
            fifo_path: None,
            console: true,
            debug: false,
        }
    }
}

/// Result of parsing a successful launch request
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    pub config: LaunchConfig,

    /// Arguments that matched no known flag
    pub unknown: Vec<String>,
}

/// What the command line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Launch(ParsedArgs),
    Help,
}

impl LaunchConfig {
    /// Parse the process arguments (program name excluded)
    pub fn from_env() -> CliAction {
        Self::from_args(std::env::args().skip(1))
    }

    /// Parse an argument list. The first element must not be the program name.
    pub fn from_args<I, S>(args: I) -> CliAction
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut config = LaunchConfig::default();
        let mut unknown = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" | "-url" => {
                    if let Some(val) = args.next() {
                        config.url = Some(val);
                    }
                }
                "--width" | "-width" => {
                    config.frame.size.width = parse_or(args.next(), config.frame.size.width);
                }
                "--height" | "-height" => {
                    config.frame.size.height = parse_or(args.next(), config.frame.size.height);
                }
                "--xpos" | "-xpos" => {
                    config.frame.position.x = parse_or(args.next(), config.frame.position.x);
                }
                "--ypos" | "-ypos" => {
                    config.frame.position.y = parse_or(args.next(), config.frame.position.y);
                }
                "--maximized" | "-maximized" => {
                    config.maximized = true;
                }
                "--always-on-top" | "--alwaysOnTop" | "-alwaysOnTop" => {
                    config.always_on_top = true;
                }
                "--fifo" | "--fifo-path" | "--fifoPath" | "-fifoPath" => {
                    if let Some(val) = args.next() {
                        config.fifo_path = Some(PathBuf::from(val));
                    }
                }
                "--no-console" | "-noConsole" => {
                    config.console = false;
                }
                "--debug" | "-debug" => {
                    config.debug = true;
                }
                "--help" | "-help" | "-h" => {
                    return CliAction::Help;
                }
                _ => {
                    log::debug!("Unknown option: {}", arg);
                    unknown.push(arg);
                }
            }
        }

        CliAction::Launch(ParsedArgs { config, unknown })
    }
}

fn parse_or(value: Option<String>, current: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(args: &[&str]) -> ParsedArgs {
        match LaunchConfig::from_args(args.iter().copied()) {
            CliAction::Launch(parsed) => parsed,
            CliAction::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_defaults() {
        let parsed = launch(&[]);
        assert_eq!(parsed.config, LaunchConfig::default());
        assert_eq!(parsed.config.frame, Frame::new(100.0, 100.0, 800.0, 600.0));
        assert!(parsed.unknown.is_empty());
        assert!(parsed.config.console);
    }

    #[test]
    fn test_all_flags() {
        let parsed = launch(&[
            "--url",
            "https://example.com",
            "--width",
            "1024",
            "--height",
            "768.5",
            "--xpos",
            "-20",
            "--ypos",
            "40",
            "--maximized",
            "--always-on-top",
            "--fifo",
            "/tmp/kiosk.fifo",
            "--no-console",
            "--debug",
        ]);
        let config = parsed.config;
        assert_eq!(config.url.as_deref(), Some("https://example.com"));
        assert_eq!(config.frame, Frame::new(-20.0, 40.0, 1024.0, 768.5));
        assert!(config.maximized);
        assert!(config.always_on_top);
        assert_eq!(config.fifo_path, Some(PathBuf::from("/tmp/kiosk.fifo")));
        assert!(!config.console);
        assert!(config.debug);
    }

    #[test]
    fn test_single_dash_spellings() {
        let parsed = launch(&["-url", "file:///tmp/a.html", "-alwaysOnTop", "-fifoPath", "p"]);
        assert_eq!(parsed.config.url.as_deref(), Some("file:///tmp/a.html"));
        assert!(parsed.config.always_on_top);
        assert_eq!(parsed.config.fifo_path, Some(PathBuf::from("p")));
    }

    #[test]
    fn test_malformed_number_keeps_default() {
        let parsed = launch(&["--width", "wide", "--height", "NaN", "--xpos", "7"]);
        assert_eq!(parsed.config.frame.size.width, 800.0);
        assert_eq!(parsed.config.frame.size.height, 600.0);
        assert_eq!(parsed.config.frame.position.x, 7.0);
    }

    #[test]
    fn test_unknown_flags_are_collected() {
        let parsed = launch(&["--bogus", "--debug", "stray"]);
        assert!(parsed.config.debug);
        assert_eq!(parsed.unknown, vec!["--bogus".to_string(), "stray".to_string()]);
    }

    #[test]
    fn test_trailing_value_flag_is_ignored() {
        let parsed = launch(&["--url"]);
        assert_eq!(parsed.config.url, None);
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(
            LaunchConfig::from_args(["--debug", "--help", "--bogus"]),
            CliAction::Help
        );
        assert_eq!(LaunchConfig::from_args(["-h"]), CliAction::Help);
    }

    #[test]
    fn test_usage_mentions_protocol() {
        assert!(USAGE.contains("setpos <x> <y>"));
        assert!(USAGE.contains("--fifo <PATH>"));
    }
}
