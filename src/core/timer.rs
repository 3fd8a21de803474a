/// Countdown timer - fires once after a duration in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl Countdown {
    /// Create inactive countdown
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration: duration_ms.max(0.0),
            elapsed: 0.0,
            active: false,
        }
    }

    /// Create and start a countdown
    pub fn started(duration_ms: f32) -> Self {
        let mut countdown = Self::new(duration_ms);
        countdown.start();
        countdown
    }

    /// Start countdown from zero
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Tick with delta, returns true exactly once when the duration is reached
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += delta_ms;

        if self.elapsed >= self.duration {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Get progress [0, 1]; a zero duration is immediately complete
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    /// Milliseconds left before firing
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once() {
        let mut timer = Countdown::new(100.0);

        assert!(!timer.tick(50.0)); // Inactive

        timer.start();
        assert!(!timer.tick(50.0)); // In progress
        assert_eq!(timer.progress(), 0.5);
        assert_eq!(timer.remaining(), 50.0);

        assert!(timer.tick(60.0)); // Complete
        assert!(!timer.tick(10.0)); // Inactive again
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn zero_duration_fires_on_first_tick() {
        let mut timer = Countdown::started(0.0);
        assert_eq!(timer.progress(), 1.0);
        assert!(timer.tick(0.0));
    }
}
