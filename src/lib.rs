//! # lovetcs
//!
//! **Floating letters in a starfield, rendered with wgpu.**
//!
//! A decorative full-window scene: the word "LOVETCS" as gently bobbing
//! textured panels, a slowly rotating 2000-point star cloud, and a camera
//! that drifts with the pointer. The interesting part is the lifecycle:
//! [`SceneController`] owns setup, per-frame animation, input handling, and
//! teardown of all GPU resources, scoped to one mount of the host window.
//!
//! ## Quick start
//!
//! ```no_run
//! fn main() {
//!     env_logger::init();
//!     lovetcs::run();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`GpuContext`] — the drawing surface, sized to the viewport
//! - [`SceneGraph`] — letter panels, starfield, and lights, built once at mount
//! - [`GlyphRasterizer`] — synthesizes one glyph texture per character
//! - [`AnimationLoop`] — continuously-rescheduled tick driver behind an
//!   injectable [`TickScheduler`]
//! - [`InputBridge`] — resize and pointer-move signals feeding the camera
//! - [`SceneController`] — composes the above; mount builds, dispose releases

mod animation;
mod app;
mod camera;
mod controller;
mod error;
mod gpu;
mod input;
mod letters;
mod mesh;
mod scene;
mod scene_pass;
mod starfield;
mod texture;

pub use animation::{
    AnimationClock, AnimationLoop, LoopState, TIME_STEP, TickScheduler, float_offset, sway_angle,
};
pub use app::{WindowScheduler, run};
pub use camera::Camera;
pub use controller::{Lifecycle, SceneController};
pub use error::SceneError;
pub use gpu::GpuContext;
pub use input::{InputBridge, Viewport};
pub use letters::{GlyphRasterizer, LetterPanel, PANEL_HEIGHT, PANEL_WIDTH, SPACING};
pub use mesh::{Mesh, Vertex3d};
pub use scene::{LABEL, Lighting, SceneGraph};
pub use scene_pass::ScenePass;
pub use starfield::{FIELD_HALF_WIDTH, STAR_COUNT, StarField};
pub use texture::Texture;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};
