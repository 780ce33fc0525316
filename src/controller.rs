//! The scene-lifecycle component.
//!
//! One [`SceneController`] exists per mount of the host window. `mount` builds
//! every leaf component in dependency order (surface, scene graph, render
//! pass, camera, input bridge) and starts the animation loop; `dispose` stops
//! the loop and detaches the event entry points, and dropping the controller
//! releases the GPU resources. Nothing is shared between controller
//! instances, so repeated mount/dispose cycles cannot leak.
//!
//! Everything except the drawing itself lives in [`Lifecycle`], which owns
//! the disposed flag and the animation loop and needs no GPU, so the
//! teardown-ordering rules are tested directly.

use std::sync::Arc;
use winit::window::Window;

use crate::animation::{AnimationLoop, LoopState, TickScheduler};
use crate::camera::Camera;
use crate::error::SceneError;
use crate::gpu::GpuContext;
use crate::input::InputBridge;
use crate::scene::{LABEL, SceneGraph};
use crate::scene_pass::ScenePass;

/// The GPU-free half of the controller: the animation loop, the disposed
/// flag, and the gating of every event entry point behind it.
///
/// Construction starts the loop and requests the first tick. After
/// `dispose` every entry point is inert; a second `dispose` does nothing.
pub struct Lifecycle {
    animation: AnimationLoop,
    disposed: bool,
}

impl Lifecycle {
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        let mut animation = AnimationLoop::new(scheduler);
        animation.start();
        Self {
            animation,
            disposed: false,
        }
    }

    /// Mutation half of one tick. Returns the new elapsed time, or `None`
    /// when disposed or when the tick is stale.
    pub fn tick(&mut self, scene: &mut SceneGraph) -> Option<f32> {
        if self.disposed {
            return None;
        }
        self.animation.tick(scene)
    }

    /// Schedule the next tick; called after the draw.
    pub fn finish_tick(&mut self) {
        self.animation.finish_tick();
    }

    /// Feed a resize into the input bridge and camera. Returns whether the
    /// event was accepted, so the caller knows to resize the surface too.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        input: &mut InputBridge,
        camera: &mut Camera,
    ) -> bool {
        if self.disposed {
            return false;
        }
        input.handle_resize(width, height, camera);
        true
    }

    /// Feed a pointer move into the camera. Returns whether the event was
    /// accepted.
    pub fn pointer_moved(&self, px: f32, py: f32, input: &InputBridge, camera: &mut Camera) -> bool {
        if self.disposed {
            return false;
        }
        input.handle_pointer_move(px, py, camera);
        true
    }

    /// Stop the loop (no further ticks) and detach the event entry points.
    /// Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.animation.stop();
        self.disposed = true;
        log::info!("scene disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn state(&self) -> LoopState {
        self.animation.state()
    }
}

/// Owns and animates one mounted scene.
pub struct SceneController {
    gpu: GpuContext,
    pass: ScenePass,
    scene: SceneGraph,
    camera: Camera,
    input: InputBridge,
    lifecycle: Lifecycle,
}

impl SceneController {
    /// Build the scene against the host window and start animating.
    ///
    /// Construction order: drawing surface, scene graph, render pass, camera,
    /// input bridge; then the animation loop starts and requests its first
    /// tick through `scheduler`. Surface or font failures propagate to the
    /// embedder, which decides fallback behavior.
    pub fn mount(
        window: Arc<Window>,
        scheduler: Box<dyn TickScheduler>,
    ) -> Result<Self, SceneError> {
        let gpu = GpuContext::new(window)?;
        let scene = SceneGraph::build(LABEL);
        let pass = ScenePass::new(&gpu, &scene)?;
        let camera = Camera::new(gpu.aspect());
        let input = InputBridge::new(gpu.width(), gpu.height());
        let lifecycle = Lifecycle::new(scheduler);

        log::info!(
            "scene mounted: {} letters, {}x{} surface",
            scene.panels.len(),
            gpu.width(),
            gpu.height()
        );

        Ok(Self {
            gpu,
            pass,
            scene,
            camera,
            input,
            lifecycle,
        })
    }

    /// Run one animation tick: advance the clock, move the panels and stars,
    /// draw, and schedule the next tick. A stale tick delivered after
    /// `dispose` does nothing.
    pub fn tick(&mut self) {
        if self.lifecycle.tick(&mut self.scene).is_some() {
            match self.pass.render(&self.gpu, &self.scene, &self.camera) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("surface lost, reconfiguring");
                    self.gpu.reconfigure();
                }
                Err(e) => log::warn!("dropped frame: {e}"),
            }
            self.lifecycle.finish_tick();
        }
    }

    /// Viewport resize: surface dimensions and camera projection update
    /// together. A no-op after dispose.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self
            .lifecycle
            .resize(width, height, &mut self.input, &mut self.camera)
        {
            self.gpu.resize(width, height);
            self.pass.ensure_depth_size(&self.gpu);
        }
    }

    /// Pointer move in window pixel coordinates. A no-op after dispose.
    pub fn pointer_moved(&mut self, px: f32, py: f32) {
        self.lifecycle
            .pointer_moved(px, py, &self.input, &mut self.camera);
    }

    /// Tear down in order: stop the animation loop (no further ticks), then
    /// detach the event entry points. Idempotent; also runs on drop, and the
    /// drawing surface itself is released when the controller is dropped.
    pub fn dispose(&mut self) {
        self.lifecycle.dispose();
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeScheduler {
        requested: Rc<Cell<u32>>,
        cancelled: Rc<Cell<u32>>,
    }

    impl TickScheduler for FakeScheduler {
        fn request_tick(&mut self) {
            self.requested.set(self.requested.get() + 1);
        }
        fn cancel_pending(&mut self) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }

    fn lifecycle() -> (Lifecycle, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let requested = Rc::new(Cell::new(0));
        let cancelled = Rc::new(Cell::new(0));
        let lifecycle = Lifecycle::new(Box::new(FakeScheduler {
            requested: Rc::clone(&requested),
            cancelled: Rc::clone(&cancelled),
        }));
        (lifecycle, requested, cancelled)
    }

    #[test]
    fn construction_starts_the_loop_and_requests_the_first_tick() {
        let (lifecycle, requested, _) = lifecycle();
        assert!(!lifecycle.is_disposed());
        assert_eq!(lifecycle.state(), LoopState::Running);
        assert_eq!(requested.get(), 1);
    }

    #[test]
    fn events_flow_until_dispose_then_stop() {
        let (mut lifecycle, _, _) = lifecycle();
        let mut input = InputBridge::new(800, 600);
        let mut camera = Camera::new(input.viewport().aspect());
        let mut scene = SceneGraph::build(LABEL);

        assert!(lifecycle.resize(1600, 900, &mut input, &mut camera));
        assert_eq!(camera.aspect, 1600.0 / 900.0);
        assert!(lifecycle.pointer_moved(1600.0, 0.0, &input, &mut camera));
        assert_eq!(camera.position.x, 1.5);
        assert!(lifecycle.tick(&mut scene).is_some());

        lifecycle.dispose();

        // Every entry point is inert now; nothing observable changes.
        assert!(!lifecycle.resize(320, 240, &mut input, &mut camera));
        assert_eq!(camera.aspect, 1600.0 / 900.0);
        assert!(!lifecycle.pointer_moved(0.0, 0.0, &input, &mut camera));
        assert_eq!(camera.position.x, 1.5);

        let y_before = scene.panels[1].position.y;
        assert_eq!(lifecycle.tick(&mut scene), None);
        assert_eq!(scene.panels[1].position.y, y_before);
    }

    #[test]
    fn dispose_stops_the_loop_and_finish_does_not_reschedule() {
        let (mut lifecycle, requested, cancelled) = lifecycle();
        let mut scene = SceneGraph::build(LABEL);

        // Dispose lands between the mutation half and the reschedule, the
        // worst-case ordering for a tick in flight.
        lifecycle.tick(&mut scene);
        lifecycle.dispose();
        lifecycle.finish_tick();

        assert!(lifecycle.is_disposed());
        assert_eq!(lifecycle.state(), LoopState::Stopped);
        assert_eq!(cancelled.get(), 1);
        assert_eq!(requested.get(), 1); // only the one from construction
    }

    #[test]
    fn repeated_dispose_is_a_no_op() {
        let (mut lifecycle, _, cancelled) = lifecycle();
        lifecycle.dispose();
        lifecycle.dispose();

        assert!(lifecycle.is_disposed());
        assert_eq!(lifecycle.state(), LoopState::Stopped);
        assert_eq!(cancelled.get(), 1);
    }
}
