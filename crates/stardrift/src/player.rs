use glam::Vec2;

/// The player's ship: a point mass with a heading.
///
/// No drag is applied; velocity only changes through [`Player::thrust`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in degrees, counter-clockwise. 0 faces local +X.
    pub orientation: f32,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Unit vector the ship's nose points along.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.orientation.to_radians())
    }

    /// Turns by `degrees` (positive is counter-clockwise).
    pub fn rotate(&mut self, degrees: f32) {
        self.orientation += degrees;
    }

    /// Adds `amount` of velocity along the current heading. Negative brakes.
    pub fn thrust(&mut self, amount: f32) {
        self.velocity += self.forward() * amount;
    }

    /// Moves the ship by its velocity over `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn forward_follows_orientation() {
        let mut p = Player::default();
        assert!((p.forward() - Vec2::X).length() < EPS);

        p.rotate(90.0);
        assert!((p.forward() - Vec2::Y).length() < EPS);

        p.rotate(-180.0);
        assert!((p.forward() + Vec2::Y).length() < EPS);
    }

    #[test]
    fn thrust_adds_along_heading() {
        let mut p = Player::default();
        p.rotate(90.0);
        p.thrust(0.5);
        assert!((p.velocity - Vec2::new(0.0, 0.5)).length() < EPS);

        p.thrust(-0.25);
        assert!((p.velocity - Vec2::new(0.0, 0.25)).length() < EPS);
    }

    #[test]
    fn integrate_is_linear_in_time() {
        let mut p = Player::new(Vec2::new(1.0, -1.0));
        p.velocity = Vec2::new(2.0, 3.0);

        for t in [0.0_f32, 0.1, 1.0, 2.5] {
            let mut q = p;
            q.integrate(t);
            assert!((q.position - (p.position + p.velocity * t)).length() < EPS);
        }
    }
}
