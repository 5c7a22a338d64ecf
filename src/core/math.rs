//! Scalar mapping, interpolation and easing curves.
//!
//! Easing curves take a progress value in `[0, 1]` and return a shaped value.
//! Curves follow <https://easings.net/>. `ease_out_back` and `ease_out_elastic`
//! overshoot `[0, 1]` before settling at 1.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::geometry::Cartesian;

/// Clamps `n` into `[min, max]`.
///
/// NaN collapses to `min` so that a degenerate ratio never leaks into drawing code.
#[must_use]
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    if n.is_nan() {
        return min;
    }
    n.max(min).min(max)
}

#[must_use]
pub fn clamp_unit(n: f64) -> f64 {
    clamp(n, 0.0, 1.0)
}

/// Euclidean distance between two points.
#[must_use]
pub fn dist(p1: Cartesian, p2: Cartesian) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Linear interpolation with `t` capped at 1.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.min(1.0)
}

/// Re-maps `x` from `[start0, stop0]` into `[start1, stop1]`.
#[must_use]
pub fn map(x: f64, start0: f64, stop0: f64, start1: f64, stop1: f64) -> f64 {
    (x - start0) / (stop0 - start0) * (stop1 - start1) + start1
}

/// Maps `x` into unit space from `[start0, stop0]`.
#[must_use]
pub fn map_to(x: f64, start0: f64, stop0: f64) -> f64 {
    (x - start0) / (stop0 - start0)
}

/// Maps a unit value `x` out to `[start1, stop1]`.
#[must_use]
pub fn map_from(x: f64, start1: f64, stop1: f64) -> f64 {
    x * (stop1 - start1) + start1
}

/// Progress of an animation of `duration` after `elapsed` time units.
///
/// A zero (or negative) duration is already complete.
#[must_use]
pub fn unit_progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    clamp_unit(elapsed / duration)
}

/// Interpolates between two hues along the shorter way round the wheel.
#[must_use]
pub fn lerp_hue(from: f64, to: f64, t: f64) -> f64 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    (from + delta * t + 360.0).rem_euclid(360.0)
}

#[must_use]
pub fn linear(x: f64) -> f64 {
    x
}

#[must_use]
pub fn ease_in_cubic(x: f64) -> f64 {
    x * x * x
}

#[must_use]
pub fn ease_out_sine(x: f64) -> f64 {
    (x * PI / 2.0).sin()
}

#[must_use]
pub fn ease_out_quad(x: f64) -> f64 {
    1.0 - (1.0 - x) * (1.0 - x)
}

#[must_use]
pub fn ease_out_cubic(x: f64) -> f64 {
    1.0 - (1.0 - x).powi(3)
}

/// Inverse of [`ease_out_cubic`].
#[must_use]
pub fn ease_out_cubic_inv(x: f64) -> f64 {
    1.0 - (1.0 - x).cbrt()
}

#[must_use]
pub fn ease_in_out_cubic(x: f64) -> f64 {
    if x < 0.5 {
        4.0 * x.powi(3)
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

#[must_use]
pub fn ease_out_quart(x: f64) -> f64 {
    1.0 - (1.0 - x).powi(4)
}

#[must_use]
pub fn ease_out_expo(x: f64) -> f64 {
    if x >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * x)
    }
}

/// Inverse of [`ease_out_expo`].
#[must_use]
pub fn ease_out_expo_inv(x: f64) -> f64 {
    if x >= 1.0 {
        1.0
    } else {
        -(1.0 / 10.0) * (1.0 - x).log2()
    }
}

#[must_use]
pub fn ease_out_back(x: f64) -> f64 {
    1.0 + 2.70158 * (x - 1.0).powi(3) + 1.70158 * (x - 1.0).powi(2)
}

pub const ELASTIC_DEFAULT_PERIOD: f64 = 0.3;
pub const ELASTIC_DEFAULT_DECAY: f64 = 10.0;

#[must_use]
pub fn ease_out_elastic(x: f64) -> f64 {
    ease_out_elastic_with(x, ELASTIC_DEFAULT_PERIOD, ELASTIC_DEFAULT_DECAY)
}

#[must_use]
pub fn ease_out_elastic_with(x: f64, period: f64, decay: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        2f64.powf(-decay * x) * ((x * 2.0 * PI) / period - 1.0).sin() + 1.0
    }
}

/// Named easing curve, used where a curve is chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInCubic,
    EaseOutSine,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutCubicInv,
    EaseInOutCubic,
    EaseOutQuart,
    EaseOutExpo,
    EaseOutExpoInv,
    EaseOutBack,
    EaseOutElastic { period: f64, decay: f64 },
}

impl Easing {
    pub const ALL_FIXED: [Easing; 11] = [
        Easing::Linear,
        Easing::EaseInCubic,
        Easing::EaseOutSine,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseOutCubicInv,
        Easing::EaseInOutCubic,
        Easing::EaseOutQuart,
        Easing::EaseOutExpo,
        Easing::EaseOutExpoInv,
        Easing::EaseOutBack,
    ];

    #[must_use]
    pub fn elastic() -> Self {
        Easing::EaseOutElastic {
            period: ELASTIC_DEFAULT_PERIOD,
            decay: ELASTIC_DEFAULT_DECAY,
        }
    }

    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Easing::Linear => linear(x),
            Easing::EaseInCubic => ease_in_cubic(x),
            Easing::EaseOutSine => ease_out_sine(x),
            Easing::EaseOutQuad => ease_out_quad(x),
            Easing::EaseOutCubic => ease_out_cubic(x),
            Easing::EaseOutCubicInv => ease_out_cubic_inv(x),
            Easing::EaseInOutCubic => ease_in_out_cubic(x),
            Easing::EaseOutQuart => ease_out_quart(x),
            Easing::EaseOutExpo => ease_out_expo(x),
            Easing::EaseOutExpoInv => ease_out_expo_inv(x),
            Easing::EaseOutBack => ease_out_back(x),
            Easing::EaseOutElastic { period, decay } => ease_out_elastic_with(x, period, decay),
        }
    }

    /// Whether the curve may leave `[0, 1]` before settling.
    #[must_use]
    pub fn overshoots(self) -> bool {
        matches!(self, Easing::EaseOutBack | Easing::EaseOutElastic { .. })
    }
}
