//! Frame-rate measurement

use crate::common::constants::FPS_WINDOW_MS;

/// Counts frames and reports a rounded rate once per measurement window.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window_ms: f64,
    window_start: f64,
    frames: u32,
    fps: u32,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(FPS_WINDOW_MS)
    }
}

impl FpsMeter {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: 0.0,
            frames: 0,
            fps: 0,
        }
    }

    /// Last reported rate
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Counts one frame at `now_ms`. Returns the new rate when a window closes.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        self.frames += 1;
        let elapsed = now_ms - self.window_start;
        if elapsed < self.window_ms {
            return None;
        }
        self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = now_ms;
        Some(self.fps)
    }
}
