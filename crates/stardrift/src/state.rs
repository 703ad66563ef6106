use glam::Mat4;

use stardrift_engine::coords::Viewport;

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::controls::ControlFlags;
use crate::planets::PlanetSystem;
use crate::player::Player;

/// Everything the simulation mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct ApplicationState {
    pub player: Player,
    pub camera: Camera,
    pub controls: ControlFlags,
    pub planets: PlanetSystem,
    /// View height / width.
    pub aspect: f32,
    config: GameConfig,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl ApplicationState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            player: Player::default(),
            camera: Camera::new(config.initial_zoom),
            controls: ControlFlags::default(),
            planets: PlanetSystem::initialise(config.planet_seed),
            aspect: 1.0,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Tracks the drawable size. A degenerate viewport keeps the last aspect.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if let Some(aspect) = viewport.aspect() {
            self.aspect = aspect;
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Opposite controls never cancel: zoom-in, rotate-left and accelerate
    /// win over their counterparts when both are held.
    pub fn update(&mut self, dt: f32) {
        self.planets.update(dt);

        let c = self.controls;
        let cfg = &self.config;

        if c.zoom_in {
            self.camera.zoom *= 1.0 - cfg.zoom_in_rate * dt;
        } else if c.zoom_out {
            self.camera.zoom *= 1.0 + cfg.zoom_out_rate * dt;
        }

        if c.rotate_left {
            self.player.rotate(cfg.rotation_rate * dt);
        } else if c.rotate_right {
            self.player.rotate(-cfg.rotation_rate * dt);
        }

        if c.accelerate {
            self.player.thrust(cfg.thrust * dt);
        } else if c.decelerate {
            self.player.thrust(-cfg.thrust * dt);
        }

        self.player.integrate(dt);
        self.camera.position = self.player.position;
    }

    /// World-to-clip transform for the current camera and aspect.
    pub fn camera_transform(&self) -> Mat4 {
        self.camera.transform(self.aspect)
    }
}
