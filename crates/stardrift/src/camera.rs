use glam::{Mat4, Vec2};

/// Orthographic follow camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Half-width of the visible region in world units. Smaller is closer.
    pub zoom: f32,
    pub position: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            position: Vec2::ZERO,
        }
    }
}

impl Camera {
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    /// World-to-clip transform.
    ///
    /// `aspect` is height / width; the visible region is
    /// `[-zoom, zoom] x [-zoom * aspect, zoom * aspect]` around `position`.
    pub fn transform(&self, aspect: f32) -> Mat4 {
        let z = self.zoom;
        let projection = Mat4::orthographic_rh(-z, z, -z * aspect, z * aspect, -1.0, 1.0);
        let view = Mat4::from_translation(-self.position.extend(0.0));
        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn project(m: Mat4, p: Vec2) -> Vec2 {
        m.project_point3(p.extend(0.0)).truncate()
    }

    #[test]
    fn camera_position_maps_to_clip_origin() {
        let cam = Camera {
            zoom: 2.0,
            position: Vec2::new(3.0, -4.0),
        };
        let clip = project(cam.transform(1.0), cam.position);
        assert!(clip.length() < 1e-5);
    }

    #[test]
    fn zoom_and_aspect_set_visible_extent() {
        let cam = Camera::new(2.0);
        let m = cam.transform(0.5);

        // Right edge at x = zoom, top edge at y = zoom * aspect.
        assert!((project(m, Vec2::new(2.0, 0.0)) - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert!((project(m, Vec2::new(0.0, 1.0)) - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn z_zero_stays_inside_depth_range() {
        let m = Camera::default().transform(1.0);
        let z = m.project_point3(Vec3::ZERO).z;
        assert!((0.0..=1.0).contains(&z));
    }
}
