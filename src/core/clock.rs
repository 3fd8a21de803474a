use std::time::{Duration, Instant};

/// Frame pacing for the animation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Measure wall-clock time between ticks
    Realtime,
    /// Report a constant delta, for headless and deterministic runs
    Fixed { frame_ms: f32 },
}

/// Frame clock - yields the delta in milliseconds since the previous frame
#[derive(Debug)]
pub struct Clock {
    pacing: Pacing,
    last_tick: Instant,
    frames: u64,
}

impl Clock {
    /// Wall-clock driven clock starting now
    pub fn realtime() -> Self {
        Self::with_pacing(Pacing::Realtime)
    }

    /// Fixed-rate clock at the given frames per second
    pub fn fixed_rate(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self::with_pacing(Pacing::Fixed {
            frame_ms: 1000.0 / fps,
        })
    }

    pub fn with_pacing(pacing: Pacing) -> Self {
        Self {
            pacing,
            last_tick: Instant::now(),
            frames: 0,
        }
    }

    /// Get delta since last tick and advance clock
    pub fn tick(&mut self) -> f32 {
        self.frames += 1;
        match self.pacing {
            Pacing::Fixed { frame_ms } => frame_ms,
            Pacing::Realtime => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_tick).as_secs_f32() * 1000.0;
                self.last_tick = now;
                delta
            }
        }
    }

    /// Sleep until the next display interval when running in real time
    pub fn wait_for_frame(&self, frame_interval: Duration) {
        if self.pacing == Pacing::Realtime {
            let elapsed = self.last_tick.elapsed();
            if elapsed < frame_interval {
                std::thread::sleep(frame_interval - elapsed);
            }
        }
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::realtime()
    }
}
