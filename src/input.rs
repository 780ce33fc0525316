//! Bridges host window events into camera and surface adjustments.
//!
//! Two independent signals feed this component: viewport resizes and pointer
//! moves. Both arrive as plain method calls from the embedding shell, so
//! tests drive them directly instead of faking a window. The controller gates
//! both behind its disposed flag, which is what "removing the listeners"
//! means here.

use crate::camera::Camera;

/// Current viewport dimensions in pixels. Source of truth for the aspect
/// ratio; mutated only by resize events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Feeds resize and pointer-move events into the camera.
pub struct InputBridge {
    viewport: Viewport,
}

impl InputBridge {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Handle a viewport size change: update the stored viewport and the
    /// camera projection. The caller resizes the drawing surface with the
    /// same dimensions so both change in lockstep.
    pub fn handle_resize(&mut self, width: u32, height: u32, camera: &mut Camera) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::new(width, height);
        camera.set_aspect(self.viewport.aspect());
    }

    /// Map pointer pixel coordinates to normalized device coordinates:
    /// x rightward and y upward, both in [-1, 1] over the viewport.
    pub fn normalized(&self, px: f32, py: f32) -> (f32, f32) {
        let nx = (px / self.viewport.width as f32) * 2.0 - 1.0;
        let ny = -(py / self.viewport.height as f32) * 2.0 + 1.0;
        (nx, ny)
    }

    /// Handle a pointer move: drift the camera toward the pointer and re-aim
    /// it at the world origin. Runs on every event, unthrottled.
    pub fn handle_pointer_move(&self, px: f32, py: f32, camera: &mut Camera) {
        let (nx, ny) = self.normalized(px, py);
        camera.track_pointer(nx, ny);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_viewport_maps_to_ndc_origin() {
        let bridge = InputBridge::new(800, 600);
        assert_eq!(bridge.normalized(400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn corners_map_to_unit_extents() {
        let bridge = InputBridge::new(800, 600);
        assert_eq!(bridge.normalized(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(bridge.normalized(800.0, 600.0), (1.0, -1.0));
    }

    #[test]
    fn pointer_at_center_leaves_camera_axis_aligned() {
        let bridge = InputBridge::new(800, 600);
        let mut camera = Camera::new(bridge.viewport().aspect());
        camera.track_pointer(0.9, 0.9);

        bridge.handle_pointer_move(400.0, 300.0, &mut camera);
        assert_eq!(camera.position.x, 0.0);
        assert_eq!(camera.position.y, 0.0);
        assert_eq!(camera.position.z, 15.0);
    }

    #[test]
    fn resize_updates_viewport_and_camera_together() {
        let mut bridge = InputBridge::new(800, 600);
        let mut camera = Camera::new(bridge.viewport().aspect());

        bridge.handle_resize(1600, 900, &mut camera);
        assert_eq!(bridge.viewport(), Viewport::new(1600, 900));
        assert_eq!(camera.aspect, 1600.0 / 900.0);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut bridge = InputBridge::new(800, 600);
        let mut camera = Camera::new(bridge.viewport().aspect());

        bridge.handle_resize(0, 900, &mut camera);
        assert_eq!(bridge.viewport(), Viewport::new(800, 600));
        assert_eq!(camera.aspect, 800.0 / 600.0);
    }
}
