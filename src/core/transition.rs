use log::{debug, warn};

use crate::core::timer::Countdown;
use crate::math::{Easing, Transform};

/// Output of a single animation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionEvent {
    /// Interpolated camera for this frame
    Frame(Transform),
    /// Final camera; emitted once, after which the controller is idle
    Complete(Transform),
}

#[derive(Debug, Clone, Copy)]
struct Running {
    from: Transform,
    to: Transform,
    timer: Countdown,
}

/// Drives the camera from one transform to another, one tick per frame.
///
/// `current` is always the last transform handed out, so a cancelled
/// transition leaves the camera exactly where the last frame put it.
#[derive(Debug, Clone)]
pub struct TransitionController {
    easing: Easing,
    current: Transform,
    running: Option<Running>,
}

impl TransitionController {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            current: Transform::IDENTITY,
            running: None,
        }
    }

    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Begin a transition, cancelling any running one first
    pub fn start(&mut self, from: Transform, to: Transform, duration_ms: f32) {
        self.cancel();
        self.current = from;
        self.running = Some(Running {
            from,
            to,
            timer: Countdown::started(duration_ms),
        });
        debug!("transition started ({duration_ms}ms)");
    }

    /// Begin a transition from wherever the camera is now
    pub fn start_from_current(&mut self, to: Transform, duration_ms: f32) {
        self.start(self.current, to, duration_ms);
    }

    /// Stop immediately; returns the transform the camera was left at
    pub fn cancel(&mut self) -> Option<Transform> {
        self.running.take().map(|_| {
            debug!("transition cancelled");
            self.current
        })
    }

    /// Jump to `to` without animating
    pub fn snap(&mut self, to: Transform) {
        self.running = None;
        self.current = to;
    }

    /// Aim the running transition at a new target, continuing from the
    /// current frame over the remaining time. Returns false when idle.
    pub fn retarget(&mut self, to: Transform) -> bool {
        let Some(run) = self.running.as_mut() else {
            return false;
        };
        run.from = self.current;
        run.to = to;
        run.timer = Countdown::started(run.timer.remaining());
        true
    }

    pub fn tick(&mut self, delta_ms: f32) -> Option<TransitionEvent> {
        let run = self.running.as_mut()?;

        if !delta_ms.is_finite() || delta_ms < 0.0 {
            warn!("ignoring frame with invalid delta {delta_ms}");
            return None;
        }

        if run.timer.tick(delta_ms) || run.timer.progress() >= 1.0 {
            let to = run.to;
            self.running = None;
            self.current = to;
            return Some(TransitionEvent::Complete(to));
        }

        let eased = self.easing.apply(run.timer.progress());
        let frame = run.from.lerp(&run.to, eased);
        self.current = frame;
        Some(TransitionEvent::Frame(frame))
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn shifted(x: f32) -> Transform {
        Transform {
            translate: Vec3::new(x, 0.0, 0.0),
            ..Transform::IDENTITY
        }
    }

    #[test]
    fn idle_controller_emits_nothing() {
        let mut controller = TransitionController::default();
        assert_eq!(controller.tick(16.0), None);
    }

    #[test]
    fn completes_exactly_once() {
        let mut controller = TransitionController::new(Easing::Linear);
        controller.start(shifted(0.0), shifted(100.0), 100.0);

        assert_eq!(controller.tick(50.0), Some(TransitionEvent::Frame(shifted(50.0))));
        assert_eq!(controller.tick(50.0), Some(TransitionEvent::Complete(shifted(100.0))));
        assert_eq!(controller.tick(50.0), None);
        assert!(!controller.is_running());
        assert_eq!(controller.current(), shifted(100.0));
    }

    #[test]
    fn eased_frames_stay_between_endpoints() {
        let mut controller = TransitionController::new(Easing::EaseInOut);
        controller.start(shifted(0.0), shifted(10.0), 600.0);
        while let Some(TransitionEvent::Frame(frame)) = controller.tick(16.0) {
            assert!((0.0..=10.0).contains(&frame.translate.x));
        }
        assert_eq!(controller.current(), shifted(10.0));
    }

    #[test]
    fn cancel_keeps_last_frame() {
        let mut controller = TransitionController::new(Easing::Linear);
        controller.start(shifted(0.0), shifted(100.0), 100.0);
        controller.tick(25.0);

        assert_eq!(controller.cancel(), Some(shifted(25.0)));
        assert_eq!(controller.cancel(), None);
        assert_eq!(controller.tick(25.0), None);
        assert_eq!(controller.current(), shifted(25.0));
    }

    #[test]
    fn restart_continues_from_interpolated_position() {
        let mut controller = TransitionController::new(Easing::Linear);
        controller.start(shifted(0.0), shifted(100.0), 100.0);
        controller.tick(40.0);
        controller.start_from_current(shifted(-100.0), 100.0);

        match controller.tick(0.0) {
            Some(TransitionEvent::Frame(frame)) => assert_eq!(frame, shifted(40.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut controller = TransitionController::default();
        controller.start(shifted(0.0), shifted(5.0), 0.0);
        assert_eq!(controller.tick(0.0), Some(TransitionEvent::Complete(shifted(5.0))));
    }

    #[test]
    fn retarget_keeps_remaining_time() {
        let mut controller = TransitionController::new(Easing::Linear);
        controller.start(shifted(0.0), shifted(100.0), 100.0);
        controller.tick(50.0);
        assert!(controller.retarget(shifted(150.0)));

        assert_eq!(controller.tick(25.0), Some(TransitionEvent::Frame(shifted(100.0))));
        assert_eq!(controller.tick(25.0), Some(TransitionEvent::Complete(shifted(150.0))));
    }

    #[test]
    fn invalid_delta_is_ignored() {
        let mut controller = TransitionController::new(Easing::Linear);
        controller.start(shifted(0.0), shifted(10.0), 100.0);
        assert_eq!(controller.tick(f32::NAN), None);
        assert_eq!(controller.tick(-5.0), None);
        assert!(controller.is_running());
    }
}
