use std::time::{Duration, Instant};

/// Paces the main loop to a fixed frame rate and reports the achieved rate.
#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    last_frame: Instant,
    fps: u32,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            budget: Duration::from_secs(1) / target_fps.max(1),
            last_frame: Instant::now(),
            fps: 0,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Frames per second measured over the last completed frame
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Blocks until the frame budget has elapsed since the previous call.
    pub fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        if let Some(remaining) = self.budget.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }

        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame);
        self.last_frame = now;
        if frame_time.as_micros() > 0 {
            self.fps = (1_000_000 / frame_time.as_micros()) as u32;
        }
    }
}
