//! Color model shared between the game and renderers.

pub mod color;

pub use color::Color;
