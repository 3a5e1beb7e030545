//! Parse errors for names read from configuration and frame scripts.
//!
//! The per-frame core never fails; only text coming from outside (config
//! files, replay scripts, command-line flags) can be rejected.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown button name: {0}")]
    UnknownButton(String),

    #[error("Unknown pad control: {0}")]
    UnknownPadButton(String),

    #[error("Unknown SOCD mode: {0}")]
    UnknownSocdMode(String),

    #[error("Unknown direction source: {0}")]
    UnknownDirectionSource(String),

    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    /// Numpad notation only covers 1 through 9.
    #[error("Invalid numpad digit: {0}")]
    InvalidNumpad(u8),
}
