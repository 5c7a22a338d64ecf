use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a drawable mark, assigned from its source series.
///
/// Identity is never derived from a mark's position in a filtered list, so it
/// survives range filtering and re-ordering between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(usize);

impl PointId {
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pixel-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
}

impl Cartesian {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Cartesian {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Polar position relative to some origin, angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub r: f64,
    pub theta: f64,
}

impl Polar {
    #[must_use]
    pub const fn new(r: f64, theta: f64) -> Self {
        Self { r, theta }
    }

    #[must_use]
    pub fn to_cartesian(self) -> Cartesian {
        Cartesian::new(self.r * self.theta.cos(), self.r * self.theta.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Point2D {
    Cartesian(Cartesian),
    Polar(Polar),
}

impl Point2D {
    #[must_use]
    pub fn to_cartesian(self) -> Cartesian {
        match self {
            Point2D::Cartesian(point) => point,
            Point2D::Polar(polar) => polar.to_cartesian(),
        }
    }

    #[must_use]
    pub fn to_polar(self) -> Polar {
        match self {
            Point2D::Polar(polar) => polar,
            Point2D::Cartesian(point) => Polar::new(point.x.hypot(point.y), point.y.atan2(point.x)),
        }
    }
}

impl From<Cartesian> for Point2D {
    fn from(value: Cartesian) -> Self {
        Point2D::Cartesian(value)
    }
}

impl From<Polar> for Point2D {
    fn from(value: Polar) -> Self {
        Point2D::Polar(value)
    }
}

/// A drawn mark eligible for hover matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverCandidate {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    pub radius: Option<f64>,
}

impl HoverCandidate {
    #[must_use]
    pub const fn new(id: PointId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            radius: None,
        }
    }

    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Builds a candidate from a point given relative to `center`, keeping its identity.
    #[must_use]
    pub fn from_point(id: PointId, point: impl Into<Point2D>, center: Cartesian) -> Self {
        let offset = point.into().to_cartesian();
        Self::new(id, center.x + offset.x, center.y + offset.y)
    }

    #[must_use]
    pub const fn position(&self) -> Cartesian {
        Cartesian::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn polar_conversion_round_trips() {
        let point = Point2D::Polar(Polar::new(10.0, FRAC_PI_2));
        let cartesian = point.to_cartesian();
        assert_abs_diff_eq!(cartesian.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cartesian.y, 10.0, epsilon = 1e-9);

        let back = Point2D::Cartesian(cartesian).to_polar();
        assert_abs_diff_eq!(back.r, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.theta, FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn candidate_from_polar_keeps_identity() {
        let candidate = HoverCandidate::from_point(
            PointId::new(4),
            Polar::new(5.0, 0.0),
            Cartesian::new(100.0, 50.0),
        );
        assert_eq!(candidate.id, PointId::new(4));
        assert_abs_diff_eq!(candidate.x, 105.0, epsilon = 1e-9);
        assert_abs_diff_eq!(candidate.y, 50.0, epsilon = 1e-9);
    }
}
