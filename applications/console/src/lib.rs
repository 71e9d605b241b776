//! Cadence console - headless playlist player
//!
//! Runs the cadence-playback state machine against a simulated device and
//! drives it from line commands, printing the presentation surfaces as text.

pub mod commands;
pub mod config;
pub mod device;
pub mod render;
pub mod session;

pub use commands::{Command, ParseError};
pub use config::ConsoleConfig;
pub use device::SimulatedDevice;
pub use session::{Flow, Session};
