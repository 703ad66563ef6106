use anyhow::Result;

use crate::input::{Key, KeyState};
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by `window::Runtime`.
///
/// Call order: `on_gpu_ready` once, then per loop iteration any number of
/// `on_key`/`on_focus`/`on_resize` callbacks followed by one `on_frame`, and finally
/// `on_exit` exactly once.
pub trait App {
    /// Called once after the window and GPU context exist.
    ///
    /// Load textures and build renderers here. An error is fatal: the runtime
    /// stops before the first frame and returns it.
    fn on_gpu_ready(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Called for every non-repeat key press or release, in arrival order.
    fn on_key(&mut self, key: Key, state: KeyState) -> AppControl {
        let _ = (key, state);
        AppControl::Continue
    }

    /// Called when the window gains or loses keyboard focus.
    ///
    /// Releases that happen while unfocused are never delivered.
    fn on_focus(&mut self, focused: bool) {
        let _ = focused;
    }

    /// Called when the drawable size changes, in physical pixels.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per loop iteration.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the loop terminates for any reason.
    fn on_exit(&mut self) {}
}
