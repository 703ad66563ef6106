use std::path::Path;

use anyhow::{Context, Result};

use stardrift_engine::coords::Viewport;
use stardrift_engine::core::{App, AppControl, FrameCtx};
use stardrift_engine::input::{Key, KeyState};
use stardrift_engine::paint::Color;
use stardrift_engine::render::texture::{disc_image, placeholder_image, wedge_image};
use stardrift_engine::render::{ImageHint, QuadRenderer, RenderCtx, RenderTarget, Texture};
use stardrift_engine::time::GameClock;

use crate::config::GameConfig;
use crate::scene::{self, Layer, SceneDraw};
use crate::state::ApplicationState;

const DISC_TEXTURE_SIZE: u32 = 128;
const WEDGE_TEXTURE_SIZE: u32 = 64;

/// GPU resources, created once the device exists.
struct Graphics {
    quad: QuadRenderer,
    player: Texture,
    background: Texture,
    disc: Texture,
}

impl Graphics {
    fn load(ctx: &RenderCtx<'_>, config: &GameConfig) -> Result<Self> {
        let quad = QuadRenderer::setup(ctx);

        let player = load_or_fallback(
            &quad,
            ctx,
            &config.player_texture_path(),
            ImageHint::Png,
            Fallback::Wedge,
        )?;
        let background = load_or_fallback(
            &quad,
            ctx,
            &config.background_texture_path(),
            ImageHint::Jpeg,
            Fallback::Transparent,
        )?;
        let disc = quad
            .texture_from_image(ctx, &disc_image(DISC_TEXTURE_SIZE), "planet disc")
            .context("failed to upload planet texture")?;

        Ok(Self {
            quad,
            player,
            background,
            disc,
        })
    }

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draws: &[SceneDraw]) {
        let Graphics {
            quad,
            player,
            background,
            disc,
        } = self;

        quad.begin_frame();

        let mut pass = quad.pre_render();
        for draw in draws {
            let texture = match draw.layer {
                Layer::Background => &*background,
                Layer::Planet(_) => &*disc,
                Layer::Player => &*player,
            };
            pass.bind_texture(texture);
            pass.set_blend(draw.blend);
            pass.set_tint(draw.tint);
            pass.render(draw.mvp);
        }

        quad.post_render(ctx, target, pass);
    }
}

/// Stand-in image for an asset that failed to load.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Fallback {
    /// The draw covers nothing.
    Transparent,
    /// A plain wedge, so the ship stays visible and its heading readable.
    Wedge,
}

impl Fallback {
    fn image(self) -> image::RgbaImage {
        match self {
            Fallback::Transparent => placeholder_image(),
            Fallback::Wedge => wedge_image(WEDGE_TEXTURE_SIZE),
        }
    }
}

/// A missing or corrupt asset is not fatal: it is logged and replaced.
fn load_or_fallback(
    quad: &QuadRenderer,
    ctx: &RenderCtx<'_>,
    path: &Path,
    hint: ImageHint,
    fallback: Fallback,
) -> Result<Texture> {
    match quad.load_texture(ctx, path, hint) {
        Ok(texture) => Ok(texture),
        Err(err) => {
            log::warn!("{err}; using {fallback:?} placeholder");
            let label = format!("placeholder for {}", path.display());
            quad.texture_from_image(ctx, &fallback.image(), &label)
                .context("failed to upload placeholder texture")
        }
    }
}

pub fn window_title(fps: f64, spf: f64) -> String {
    format!("Stardrift: Average fps: {fps:.0}; Average spf: {spf:.6}")
}

/// The game: simulation state plus the GPU resources that draw it.
pub struct StardriftApp {
    state: ApplicationState,
    clock: GameClock,
    graphics: Option<Graphics>,
}

impl StardriftApp {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: ApplicationState::new(config),
            clock: GameClock::new(),
            graphics: None,
        }
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }
}

impl App for StardriftApp {
    fn on_gpu_ready(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.state.set_viewport(ctx.viewport);
        self.graphics = Some(Graphics::load(ctx, self.state.config())?);
        log::info!("scene ready: {} planet bodies", self.state.planets.len());
        Ok(())
    }

    fn on_key(&mut self, key: Key, state: KeyState) -> AppControl {
        self.state.controls.apply_key(key, state)
    }

    fn on_focus(&mut self, focused: bool) {
        if !focused {
            self.state.controls.clear();
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.state.set_viewport(Viewport::new(width as f32, height as f32));
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = self.clock.tick();
        self.state.update(time.dt);

        let draws = scene::compose(&self.state);

        let control = match self.graphics.as_mut() {
            Some(graphics) => ctx.render(Color::BLACK, |rctx, target| {
                graphics.draw(rctx, target, &draws)
            }),
            None => AppControl::Continue,
        };

        ctx.window
            .set_title(&window_title(self.clock.average_fps(), self.clock.average_spf()));

        control
    }

    fn on_exit(&mut self) {
        self.clock.stop();
        log::info!("{}", self.clock.report());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlFlags;

    #[test]
    fn title_format() {
        assert_eq!(
            window_title(59.6, 0.016_777),
            "Stardrift: Average fps: 60; Average spf: 0.016777"
        );
        assert_eq!(window_title(0.0, 0.0), "Stardrift: Average fps: 0; Average spf: 0.000000");
    }

    #[test]
    fn keys_drive_state_without_a_gpu() {
        let mut app = StardriftApp::new(GameConfig::default());

        assert_eq!(app.on_key(Key::W, KeyState::Pressed), AppControl::Continue);
        assert!(app.state().controls.accelerate);

        app.on_resize(1024, 512);
        assert_eq!(app.state().aspect, 0.5);

        assert_eq!(app.on_key(Key::Escape, KeyState::Pressed), AppControl::Exit);
    }

    #[test]
    fn focus_loss_releases_controls_but_later_presses_count() {
        let mut app = StardriftApp::new(GameConfig::default());
        app.on_key(Key::W, KeyState::Pressed);
        app.on_key(Key::A, KeyState::Pressed);

        app.on_focus(false);
        assert_eq!(app.state().controls, ControlFlags::default());

        app.on_focus(true);
        app.on_key(Key::W, KeyState::Pressed);
        assert!(app.state().controls.accelerate);
        assert!(!app.state().controls.rotate_left);
    }

    #[test]
    fn player_fallback_is_visible() {
        let img = Fallback::Wedge.image();
        assert!(img.pixels().any(|p| p[3] == 255));

        let img = Fallback::Transparent.image();
        assert!(img.pixels().all(|p| p[3] == 0));
    }
}
