//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window system events into `InputEvent`s,
//! which the runtime forwards to `core::App::on_key` / `on_focus`.

pub(crate) mod platform;
mod types;

pub use types::{InputEvent, Key, KeyState};
