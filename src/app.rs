//! The embedding shell: a winit application that hosts one scene.
//!
//! The shell owns the window lifecycle and forwards its signals to the
//! controller: `resumed` mounts, `suspended` and close unmount, and resize /
//! cursor / redraw events feed the input bridge and animation loop. The
//! scene itself never touches winit types beyond the window handle.

use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animation::TickScheduler;
use crate::controller::SceneController;

/// Tick scheduler backed by the window's redraw facility.
///
/// `request_redraw` cannot be revoked, so cancellation relies on the
/// animation loop discarding ticks delivered after `stop()`.
pub struct WindowScheduler {
    window: Arc<Window>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl TickScheduler for WindowScheduler {
    fn request_tick(&mut self) {
        self.window.request_redraw();
    }
}

enum App {
    Pending,
    Running { controller: SceneController },
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Running { .. } = self {
            return;
        }

        let window_attrs = WindowAttributes::default().with_title("LOVETCS");
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                // No host surface to mount into: nothing to do.
                log::error!("no window to mount into: {e}");
                event_loop.exit();
                return;
            }
        };

        let scheduler = Box::new(WindowScheduler::new(window.clone()));
        match SceneController::mount(window, scheduler) {
            Ok(controller) => *self = App::Running { controller },
            Err(e) => {
                // Surface initialization failures propagate here; the shell's
                // fallback is to report and quit.
                log::error!("failed to mount scene: {e}");
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Unmount: dropping the controller stops the loop and releases the
        // surface.
        *self = App::Pending;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running { controller } = self else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                controller.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                controller.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                controller.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                controller.tick();
            }
            _ => {}
        }
    }
}

/// Run the scene full-window until the host closes it.
pub fn run() {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::Pending;
    event_loop.run_app(&mut app).expect("event loop error");
}
