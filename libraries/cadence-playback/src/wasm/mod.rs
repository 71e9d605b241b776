//! WASM bindings for cadence-playback
//!
//! Drives an `HTMLAudioElement` from the core player so the page only has
//! to forward clicks and render the callbacks.

pub mod device;
pub mod player;

pub use device::AudioElementDevice;
pub use player::WasmPlayer;
