//! Screen-space geometry shared by the runtime and renderers.
//!
//! World-space math uses `glam` directly; this module only covers the
//! drawable surface.

mod viewport;

pub use viewport::Viewport;
