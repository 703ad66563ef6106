//! Turns [`ApplicationState`] into an ordered list of quad draws.
//!
//! Pure and GPU-free: the app maps each [`Layer`] to its texture and feeds the
//! draws, in order, to the quad renderer.

use glam::{Mat4, Quat, Vec3};

use stardrift_engine::paint::Color;
use stardrift_engine::render::BlendMode;

use crate::state::ApplicationState;

/// What a draw depicts, and therefore which texture it samples.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Layer {
    Background,
    /// Index into [`crate::planets::PlanetSystem::planets`].
    Planet(usize),
    Player,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneDraw {
    pub layer: Layer,
    pub mvp: Mat4,
    pub blend: BlendMode,
    pub tint: Color,
}

/// Background, then every planet in insertion order, then the player.
///
/// Only the player is alpha blended.
pub fn compose(state: &ApplicationState) -> Vec<SceneDraw> {
    let camera = state.camera_transform();
    let cfg = state.config();

    let mut draws = Vec::with_capacity(state.planets.len() + 2);

    let bg = cfg.background_scale;
    draws.push(SceneDraw {
        layer: Layer::Background,
        mvp: camera * Mat4::from_scale(Vec3::new(bg, bg, 1.0)),
        blend: BlendMode::Opaque,
        tint: Color::WHITE,
    });

    state.planets.render(camera, &mut draws);

    draws.push(SceneDraw {
        layer: Layer::Player,
        mvp: camera * player_model(state),
        blend: BlendMode::Alpha,
        tint: Color::WHITE,
    });

    draws
}

/// `translate(position) * rotate_z(orientation) * scale(player_scale)`.
fn player_model(state: &ApplicationState) -> Mat4 {
    let s = state.config().player_scale;
    let player = &state.player;
    Mat4::from_scale_rotation_translation(
        Vec3::new(s, s, 1.0),
        Quat::from_rotation_z(player.orientation.to_radians()),
        player.position.extend(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};

    #[test]
    fn draw_order_and_blending() {
        let state = ApplicationState::default();
        let draws = compose(&state);

        assert_eq!(draws.len(), state.planets.len() + 2);
        assert_eq!(draws[0].layer, Layer::Background);
        assert_eq!(draws.last().map(|d| d.layer), Some(Layer::Player));

        for (i, draw) in draws[1..draws.len() - 1].iter().enumerate() {
            assert_eq!(draw.layer, Layer::Planet(i));
        }

        let blended: Vec<_> = draws.iter().filter(|d| d.blend == BlendMode::Alpha).collect();
        assert_eq!(blended.len(), 1);
        assert_eq!(blended[0].layer, Layer::Player);
    }

    #[test]
    fn player_quad_is_centred_on_screen() {
        let mut state = ApplicationState::default();
        state.player.position = Vec2::new(5.0, -2.0);
        state.player.orientation = 90.0;
        state.camera.position = state.player.position;

        let draws = compose(&state);
        let player = draws.last().unwrap().mvp;

        let centre = player * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(centre.truncate().truncate().length() < 1e-5);

        // Rotated 90°: the quad's +X corner lands on screen +Y at player_scale / zoom.
        let nose = player * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((nose.x).abs() < 1e-5);
        assert!((nose.y - 0.15).abs() < 1e-5);
    }

    #[test]
    fn background_ignores_player_transform() {
        let mut state = ApplicationState::default();
        state.player.orientation = 45.0;
        state.player.position = Vec2::new(1.0, 1.0);

        let draws = compose(&state);
        let expected = state.camera_transform() * Mat4::from_scale(Vec3::new(20.0, 20.0, 1.0));
        assert_eq!(draws[0].mvp, expected);
    }
}
