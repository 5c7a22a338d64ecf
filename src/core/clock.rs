use serde::{Deserialize, Serialize};
use tracing::warn;

/// Elapsed animation time of one chart, in milliseconds.
///
/// Only `update` advances the clock, so elapsed time never decreases between
/// resets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    elapsed_time: f64,
}

impl AnimationClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { elapsed_time: 0.0 }
    }

    /// Advances the clock by `dt`. Negative or non-finite deltas are ignored.
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "ignoring invalid frame delta");
            return;
        }
        self.elapsed_time += dt;
    }

    pub fn reset(&mut self) {
        self.elapsed_time = 0.0;
    }

    #[must_use]
    pub const fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_resets() {
        let mut clock = AnimationClock::new();
        clock.update(16.0);
        clock.update(17.5);
        assert_eq!(clock.elapsed_time(), 33.5);

        clock.update(-5.0);
        clock.update(f64::NAN);
        assert_eq!(clock.elapsed_time(), 33.5);

        clock.reset();
        assert_eq!(clock.elapsed_time(), 0.0);
    }
}
