//! Fighting game input history.
//!
//! Turns per-frame controller snapshots into logical button states with
//! SOCD-cleaned directions, and keeps a bounded history of distinct inputs
//! with how many frames each lasted.

pub mod buttons;
pub mod config;
pub mod device;
pub mod error;
pub mod history;
pub mod keyboard;
pub mod macros;
pub mod mapping;
pub mod replay;
pub mod socd;
pub mod state;

pub use buttons::{ButtonName, Direction};
pub use config::AppConfig;
pub use device::{DeviceState, PadButton, PadButtons, PadState};
pub use error::ParseError;
pub use history::{HistorySettings, InputBuffer, InputEntry};
pub use mapping::{ButtonMap, InputMap};
pub use socd::{DirectionSources, SocdMode};
pub use state::{Button, ButtonStatus, GameInput, State, Stick};
