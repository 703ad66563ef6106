//! Stardrift: a small 2D space-flight demo.
//!
//! The simulation (`state`, `player`, `camera`, `planets`, `controls`) and the
//! scene composition are plain data and run without a GPU. `app` wires them
//! to the engine runtime.

pub mod app;
pub mod camera;
pub mod config;
pub mod controls;
pub mod planets;
pub mod player;
pub mod scene;
pub mod state;

pub use app::StardriftApp;
pub use config::GameConfig;
