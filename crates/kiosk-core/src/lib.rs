//! Kiosk Core Library
//!
//! Shared geometry types, errors, and the launch configuration for kiosk.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CliAction, LaunchConfig, ParsedArgs};
pub use error::{KioskError, KioskResult};
