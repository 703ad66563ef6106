use std::path::PathBuf;

/// Tunables for the demo. Every field has the value the game ships with as
/// its default; there is no config file.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Directory the texture paths below are resolved against.
    pub assets_dir: PathBuf,
    /// Player ship sprite (PNG with alpha).
    pub player_texture: PathBuf,
    /// Starfield backdrop (JPEG).
    pub background_texture: PathBuf,

    /// Seed for the planet layout.
    pub planet_seed: u64,

    pub background_scale: f32,
    pub player_scale: f32,

    /// Velocity gained per second of thrust, in world units/s².
    pub thrust: f32,
    /// Degrees per second.
    pub rotation_rate: f32,
    /// Zoom-in shrinks the zoom by this fraction per second.
    pub zoom_in_rate: f32,
    /// Zoom-out grows the zoom by this fraction per second.
    pub zoom_out_rate: f32,
    pub initial_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets/textures"),
            player_texture: PathBuf::from("player1_ship.png"),
            background_texture: PathBuf::from("stars.jpg"),
            planet_seed: crate::planets::DEFAULT_SEED,
            background_scale: 20.0,
            player_scale: 0.15,
            thrust: 0.5,
            rotation_rate: 90.0,
            zoom_in_rate: 0.5,
            zoom_out_rate: 1.0,
            initial_zoom: 1.0,
        }
    }
}

impl GameConfig {
    pub fn player_texture_path(&self) -> PathBuf {
        self.assets_dir.join(&self.player_texture)
    }

    pub fn background_texture_path(&self) -> PathBuf {
        self.assets_dir.join(&self.background_texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_paths_resolve_against_assets_dir() {
        let cfg = GameConfig {
            assets_dir: PathBuf::from("/data"),
            ..GameConfig::default()
        };
        assert_eq!(cfg.player_texture_path(), PathBuf::from("/data/player1_ship.png"));
        assert_eq!(cfg.background_texture_path(), PathBuf::from("/data/stars.jpg"));
    }
}
