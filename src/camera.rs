use glam::{Mat4, Vec3};

/// Horizontal/vertical range the camera drifts across as the pointer moves
/// over the full viewport.
pub const POINTER_RANGE: f32 = 1.5;

const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const INITIAL_Z: f32 = 15.0;

/// Perspective camera for the scene.
///
/// Field of view and near/far planes are fixed; the aspect ratio follows the
/// viewport and the x/y position follows the pointer. The camera is created
/// once at mount and never recreated while mounted.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32, // radians
    pub aspect: f32,
}

impl Camera {
    /// Create the camera at its initial pose: back along +Z, looking at the
    /// world origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, INITIAL_Z),
            target: Vec3::ZERO,
            fov: FOV_DEGREES.to_radians(),
            aspect,
        }
    }

    /// Update the aspect ratio. Must happen together with the surface resize
    /// or the projection distorts.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Drift the camera with the pointer.
    ///
    /// `nx`/`ny` are normalized device coordinates in [-1, 1]. Only x and y
    /// move; z keeps its initial value, and the camera re-orients toward the
    /// fixed world origin.
    pub fn track_pointer(&mut self, nx: f32, ny: f32) {
        self.position.x = nx * POINTER_RANGE;
        self.position.y = ny * POINTER_RANGE;
        self.target = Vec3::ZERO;
    }

    /// World-to-camera view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Camera-to-clip projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, NEAR, FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_back_on_z_looking_at_origin() {
        let camera = Camera::new(16.0 / 9.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 15.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn pointer_tracking_leaves_z_untouched() {
        let mut camera = Camera::new(1.0);
        camera.track_pointer(1.0, -1.0);
        assert_eq!(camera.position, Vec3::new(1.5, -1.5, 15.0));

        camera.track_pointer(0.0, 0.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 15.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn aspect_follows_resize() {
        let mut camera = Camera::new(800.0 / 600.0);
        camera.set_aspect(1600.0 / 900.0);
        assert_eq!(camera.aspect, 1600.0 / 900.0);
    }
}
