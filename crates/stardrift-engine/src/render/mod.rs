//! GPU rendering subsystem.
//!
//! Every sprite-like visual is one textured quad: a single shared unit-quad
//! geometry, re-skinned per draw by texture binding and transform.
//!
//! Convention:
//! - the quad spans [-1, 1] on both axes, +Y up
//! - each draw carries its resolved model-view-projection matrix
//! - textures are straight-alpha sRGB

mod ctx;
pub mod quad;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{BlendMode, QuadPass, QuadRenderer};
pub use texture::{ImageHint, Texture, TextureError};
