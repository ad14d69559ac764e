//! Eased animation between two viewports

/// Quadratic ease-in-out on `[0, 1]`
pub fn ease_in_out(progress: f64) -> f64 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

/// The part of a viewport a transition animates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub center: (f64, f64),
    pub zoom: f64,
}

/// Where an advancing transition currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub waypoint: Waypoint,
    pub finished: bool,
}

/// An in-flight flight from `start` to `target`.
///
/// The clock starts at the first [`Transition::advance`] call, so a
/// transition installed between frames begins on the next frame. Centre and
/// zoom are interpolated linearly and independently through [`ease_in_out`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    start: Waypoint,
    target: Waypoint,
    start_time: Option<f64>,
    duration_ms: f64,
}

impl Transition {
    pub fn new(start: Waypoint, target: Waypoint, duration_ms: f64) -> Self {
        Self {
            start,
            target,
            start_time: None,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn target(&self) -> Waypoint {
        self.target
    }

    pub fn advance(&mut self, now_ms: f64) -> TransitionStep {
        let start_time = *self.start_time.get_or_insert(now_ms);
        let elapsed = now_ms - start_time;
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            // snap so that nothing of the start survives rounding
            return TransitionStep {
                waypoint: self.target,
                finished: true,
            };
        }

        let eased = ease_in_out(progress);
        let lerp = |a: f64, b: f64| a + (b - a) * eased;
        TransitionStep {
            waypoint: Waypoint {
                center: (
                    lerp(self.start.center.0, self.target.center.0),
                    lerp(self.start.center.1, self.target.center.1),
                ),
                zoom: lerp(self.start.zoom, self.target.zoom),
            },
            finished: false,
        }
    }
}
