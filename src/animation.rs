//! The animation loop: a small state machine driven by the host's per-frame
//! callback facility.
//!
//! The loop never owns a timer. It asks an injected [`TickScheduler`] for the
//! next tick and the host delivers it (in production that is
//! `Window::request_redraw`, in tests a counting fake). Each tick advances the
//! clock by a fixed nominal step, mutates the scene, and reschedules only
//! while still running — so `stop()` guarantees no tick is scheduled after it
//! returns, and a tick already in flight is discarded by the state check.
//!
//! The step is nominal (0.016, assuming ~60 ticks/second), not a measured
//! delta, so visual speed follows the display refresh rate. A deliberate
//! choice: it keeps the motion functions exact under test, at the cost of the
//! scene running faster on high-refresh displays.

use crate::scene::SceneGraph;

/// Fixed nominal time step added to the clock on every tick.
pub const TIME_STEP: f32 = 0.016;

/// Vertical float frequency.
pub const FLOAT_SPEED: f32 = 1.5;
/// Vertical float amplitude, world units.
pub const FLOAT_AMPLITUDE: f32 = 0.3;

/// Y-axis sway frequency.
pub const SWAY_SPEED: f32 = 0.5;
/// Y-axis sway amplitude, radians.
pub const SWAY_AMPLITUDE: f32 = 0.1;

/// Vertical offset of a letter panel at elapsed time `time` with the panel's
/// fixed phase. Pure and idempotent in `time`.
pub fn float_offset(time: f32, phase: f32) -> f32 {
    (time * FLOAT_SPEED + phase).sin() * FLOAT_AMPLITUDE
}

/// Y-axis rotation of a letter panel at elapsed time `time`. Pure and
/// idempotent in `time`.
pub fn sway_angle(time: f32, phase: f32) -> f32 {
    (time * SWAY_SPEED + phase).sin() * SWAY_AMPLITUDE
}

/// Monotonic elapsed-time accumulator for one mounted scene.
///
/// Advanced by [`TIME_STEP`] per tick regardless of wall-clock time; reset at
/// mount, discarded at unmount.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationClock {
    elapsed: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by the fixed step and return the new elapsed time.
    pub fn advance(&mut self) -> f32 {
        self.elapsed += TIME_STEP;
        self.elapsed
    }

    /// Elapsed time accumulated so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Capability to schedule the next animation tick.
///
/// Abstracts the host's "next frame" primitive so the loop can be tested
/// deterministically. `cancel_pending` is advisory: a host that cannot revoke
/// an already-requested tick may deliver it anyway, and the loop discards it.
pub trait TickScheduler {
    /// Ask the host to deliver one tick.
    fn request_tick(&mut self);

    /// Best-effort cancellation of a previously requested tick.
    fn cancel_pending(&mut self) {}
}

/// Loop state. The only terminal transition is `stop()` at dispose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Continuously-rescheduled animation driver.
///
/// Tick order per the scene contract: advance the clock, mutate every letter
/// panel and the starfield, draw, reschedule. The draw happens outside this
/// struct, so one tick is split into [`AnimationLoop::tick`] (advance +
/// mutate) and [`AnimationLoop::finish_tick`] (reschedule if still running),
/// with the caller's draw in between.
pub struct AnimationLoop {
    state: LoopState,
    clock: AnimationClock,
    scheduler: Box<dyn TickScheduler>,
}

impl AnimationLoop {
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            state: LoopState::Stopped,
            clock: AnimationClock::new(),
            scheduler,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Elapsed animation time.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Transition Stopped → Running and request the first tick. A no-op when
    /// already running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.scheduler.request_tick();
    }

    /// Transition Running → Stopped.
    ///
    /// After this returns no further tick is scheduled; a tick the host has
    /// already queued is discarded by [`AnimationLoop::tick`].
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.scheduler.cancel_pending();
    }

    /// Run the mutation half of one tick.
    ///
    /// Returns the new elapsed time, or `None` if the loop is stopped (a
    /// stale tick delivered after `stop()`). The caller draws, then calls
    /// [`AnimationLoop::finish_tick`].
    pub fn tick(&mut self, scene: &mut SceneGraph) -> Option<f32> {
        if self.state != LoopState::Running {
            return None;
        }
        let time = self.clock.advance();
        for panel in &mut scene.panels {
            panel.animate(time);
        }
        scene.stars.spin();
        Some(time)
    }

    /// Request the next tick, unless the loop was stopped during the draw.
    pub fn finish_tick(&mut self) {
        if self.state == LoopState::Running {
            self.scheduler.request_tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counting scheduler standing in for the host's redraw facility.
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

    fn looped() -> (AnimationLoop, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let requested = Rc::new(Cell::new(0));
        let cancelled = Rc::new(Cell::new(0));
        let animation = AnimationLoop::new(Box::new(FakeScheduler {
            requested: Rc::clone(&requested),
            cancelled: Rc::clone(&cancelled),
        }));
        (animation, requested, cancelled)
    }

    #[test]
    fn motion_is_pure_and_at_rest_for_zero_phase() {
        assert_eq!(float_offset(0.0, 0.0), 0.0);
        assert_eq!(sway_angle(0.0, 0.0), 0.0);

        // Idempotent for a fixed time.
        let t = 3.7;
        let phase = 1.5;
        assert_eq!(float_offset(t, phase), float_offset(t, phase));
        assert_eq!(sway_angle(t, phase), sway_angle(t, phase));

        assert_eq!(float_offset(t, phase), (t * 1.5 + phase).sin() * 0.3);
        assert_eq!(sway_angle(t, phase), (t * 0.5 + phase).sin() * 0.1);
    }

    #[test]
    fn clock_accumulates_fixed_steps() {
        let mut clock = AnimationClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        for _ in 0..3 {
            clock.advance();
        }
        assert!((clock.elapsed() - 3.0 * TIME_STEP).abs() < 1e-6);
    }

    #[test]
    fn start_requests_first_tick_once() {
        let (mut animation, requested, _) = looped();
        assert_eq!(animation.state(), LoopState::Stopped);

        animation.start();
        assert_eq!(animation.state(), LoopState::Running);
        assert_eq!(requested.get(), 1);

        // Starting again while running does not double-schedule.
        animation.start();
        assert_eq!(requested.get(), 1);
    }

    #[test]
    fn tick_mutates_scene_and_finish_reschedules() {
        let (mut animation, requested, _) = looped();
        let mut scene = SceneGraph::build("LOVETCS");
        animation.start();

        let time = animation.tick(&mut scene).unwrap();
        assert!((time - TIME_STEP).abs() < 1e-6);
        // Panel 1 has phase 0.5, so it moved off its rest height.
        assert_ne!(scene.panels[1].position.y, 0.0);
        assert!(scene.stars.rotation_y() > 0.0);

        animation.finish_tick();
        assert_eq!(requested.get(), 2);
    }

    #[test]
    fn stale_tick_after_stop_is_discarded() {
        let (mut animation, requested, cancelled) = looped();
        let mut scene = SceneGraph::build("LOVETCS");
        animation.start();
        animation.stop();

        assert_eq!(animation.state(), LoopState::Stopped);
        assert_eq!(cancelled.get(), 1);
        assert_eq!(animation.tick(&mut scene), None);
        assert_eq!(scene.panels[1].position.y, 0.0);

        // A stop between mutation and finish also prevents rescheduling.
        animation.start();
        animation.tick(&mut scene);
        animation.stop();
        animation.finish_tick();
        assert_eq!(requested.get(), 2); // one per start, none from finish_tick

        // Repeated stop is a no-op.
        animation.stop();
        assert_eq!(cancelled.get(), 2);
    }
}
