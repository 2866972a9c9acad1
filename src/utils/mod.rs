use std::time::{Duration, Instant};

use log::info;

/// Logs the frame rate once per second of ticks.
#[derive(Debug)]
pub struct FPSCounter {
    last_instant: Instant,
    frame_count: u32,
    last_fps: Option<f64>,
}

impl Default for FPSCounter {
    fn default() -> Self {
        Self {
            last_instant: Instant::now(),
            frame_count: 0,
            last_fps: None,
        }
    }
}

impl FPSCounter {
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frame_count += 1;
        let elapsed = now.duration_since(self.last_instant);

        if elapsed >= Duration::from_secs(1) {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();

            info!("FPS: {:.2}", fps);

            self.last_fps = Some(fps);
            self.frame_count = 0;
            self.last_instant = now;
        }
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_after_a_second() {
        let mut counter = FPSCounter::default();
        let start = counter.last_instant;
        for i in 1..60 {
            counter.tick_at(start + Duration::from_millis(i * 16));
        }
        assert_eq!(counter.last_fps(), None);

        counter.tick_at(start + Duration::from_secs(2));
        let fps = counter.last_fps().unwrap();
        assert!((fps - 30.0).abs() < 1e-9);
        assert_eq!(counter.frame_count, 0);
    }
}
