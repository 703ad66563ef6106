//! A small deterministic planet system orbiting the world origin.
//!
//! Planets are placed once from a seeded RNG; after that only their orbital
//! phase and self-spin change. Positions are never stored, they are derived
//! from phase and radius whenever asked for.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use stardrift_engine::paint::Color;
use stardrift_engine::render::BlendMode;

use crate::scene::{Layer, SceneDraw};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x5747_a7e1;

/// Orbiting planets besides the central star.
pub const PLANET_COUNT: usize = 5;

/// Angular speed of a body at orbit radius 1, in rad/s.
const BASE_ORBIT_SPEED: f32 = 0.6;

const STAR_SCALE: f32 = 0.35;
const STAR_SPIN_SPEED: f32 = 0.1;

const FIRST_ORBIT: f32 = 1.0;
const ORBIT_SPACING: f32 = 0.75;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Planet {
    /// Distance from the origin. 0 for the central star.
    pub orbit_radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    /// Current orbital angle in `[0, 2π)`.
    pub phase: f32,
    /// Half-size of the drawn quad in world units.
    pub scale: f32,
    /// Current self-rotation in `[0, 2π)`.
    pub spin: f32,
    pub spin_speed: f32,
    pub tint: Color,
}

impl Planet {
    /// Advances phase and spin by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.phase = (self.phase + self.angular_speed * dt).rem_euclid(TAU);
        self.spin = (self.spin + self.spin_speed * dt).rem_euclid(TAU);
    }

    /// World position on the orbit.
    pub fn position(&self) -> Vec2 {
        self.orbit_radius * Vec2::from_angle(self.phase)
    }

    /// `translate(position) * rotate_z(spin) * scale(scale)`.
    pub fn model_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.scale, self.scale, 1.0),
            Quat::from_rotation_z(self.spin),
            self.position().extend(0.0),
        )
    }
}

/// Fixed set of bodies: index 0 is the star, the rest orbit it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetSystem {
    planets: Vec<Planet>,
}

impl Default for PlanetSystem {
    fn default() -> Self {
        Self::initialise(DEFAULT_SEED)
    }
}

impl PlanetSystem {
    /// Builds the star and [`PLANET_COUNT`] planets from `seed`.
    ///
    /// The same seed always yields the same system.
    pub fn initialise(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut planets = Vec::with_capacity(PLANET_COUNT + 1);

        planets.push(Planet {
            orbit_radius: 0.0,
            angular_speed: 0.0,
            phase: 0.0,
            scale: STAR_SCALE,
            spin: 0.0,
            spin_speed: STAR_SPIN_SPEED,
            tint: Color::rgb(1.0, 0.85, 0.45),
        });

        for i in 0..PLANET_COUNT {
            let orbit_radius = FIRST_ORBIT + i as f32 * ORBIT_SPACING + rng.random::<f32>() * 0.25;
            let angular_speed = BASE_ORBIT_SPEED / orbit_radius.powf(1.5);

            planets.push(Planet {
                orbit_radius,
                angular_speed,
                phase: rng.random::<f32>() * TAU,
                scale: 0.06 + rng.random::<f32>() * 0.1,
                spin: rng.random::<f32>() * TAU,
                spin_speed: (rng.random::<f32>() - 0.5) * 2.0,
                tint: Color::rgb(
                    0.3 + 0.7 * rng.random::<f32>(),
                    0.3 + 0.7 * rng.random::<f32>(),
                    0.3 + 0.7 * rng.random::<f32>(),
                ),
            });
        }

        log::debug!("planet system initialised from seed {seed:#x}: {} bodies", planets.len());
        Self { planets }
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn update(&mut self, dt: f32) {
        for planet in &mut self.planets {
            planet.update(dt);
        }
    }

    /// Appends one opaque disc draw per body, in insertion order.
    pub fn render(&self, camera: Mat4, batch: &mut Vec<SceneDraw>) {
        batch.extend(self.planets.iter().enumerate().map(|(i, planet)| SceneDraw {
            layer: Layer::Planet(i),
            mvp: camera * planet.model_transform(),
            blend: BlendMode::Opaque,
            tint: planet.tint,
        }));
    }
}
