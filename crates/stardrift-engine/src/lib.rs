//! Stardrift engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the game: window and event
//! loop, wgpu device/surface, keyboard input, frame timing, logging, textures
//! and the textured-quad renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
