use std::time::Duration;

/// Work scheduled for one pass of the driving loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Simulation ticks to run before rendering.
    pub ticks: u32,
    /// Fraction of a tick left in the accumulator, in `[0, 1)`, for render
    /// interpolation.
    pub alpha: f32,
}

/// Fixed-timestep accumulator: ticks run at a constant rate, renders run once
/// per loop pass with an interpolation factor.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    total_ticks: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FixedTimestep {
    /// A timestep ticking `fps` times per second. Zero is treated as one.
    pub fn new(fps: u32) -> Self {
        Self {
            step: step_for(fps),
            accumulator: Duration::ZERO,
            total_ticks: 0,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.step = step_for(fps);
        tracing::debug!(fps, step = ?self.step, "timestep changed");
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Add elapsed wall time and return how many ticks are due.
    pub fn advance(&mut self, elapsed: Duration) -> FrameStep {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        self.total_ticks += u64::from(ticks);
        FrameStep {
            ticks,
            alpha: self.accumulator.as_secs_f32() / self.step.as_secs_f32(),
        }
    }
}

fn step_for(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
