//! Polyline traced progressively by arc length, with per-point reveal times.

use crate::core::math::{dist, ease_out_back, ease_out_expo_inv, map_from};
use crate::core::{Cartesian, PointId};
use crate::render::Canvas;

/// One straight piece of the line with its cumulative arc-length span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub id: PointId,
    /// Data key of the segment's first point, e.g. its year.
    pub key: f64,
    pub p0: Cartesian,
    pub p1: Cartesian,
    pub s0: f64,
    pub s1: f64,
}

impl LineSegment {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.s1 - self.s0
    }
}

/// A data point with the window in which the line passes through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedPoint {
    pub id: PointId,
    pub key: f64,
    pub position: Cartesian,
    pub t0: f64,
    pub t1: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    segments: Vec<LineSegment>,
    total_length: f64,
    end_key: f64,
}

impl LinePath {
    /// Builds the path through `points`, given as `(key, position)` in order.
    /// Ids are the positions in `points`.
    #[must_use]
    pub fn new(points: &[(f64, Cartesian)]) -> Self {
        let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
        let mut cumulative = 0.0;
        for (i, pair) in points.windows(2).enumerate() {
            let (key, p0) = pair[0];
            let (_, p1) = pair[1];
            let length = dist(p0, p1);
            segments.push(LineSegment {
                id: PointId::new(i),
                key,
                p0,
                p1,
                s0: cumulative,
                s1: cumulative + length,
            });
            cumulative += length;
        }
        Self {
            segments,
            total_length: cumulative,
            end_key: points.last().map_or(f64::NAN, |(key, _)| *key),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Appends the first `target_length` of the line to the current path.
    ///
    /// Only segments accepted by `include` are traced; the first one starts a
    /// subpath. `project` maps every emitted vertex, which lets a caller trace
    /// the same progress along a different shape (such as a horizontal line).
    pub fn trace(
        &self,
        canvas: &mut dyn Canvas,
        target_length: f64,
        include: impl Fn(&LineSegment) -> bool,
        project: impl Fn(Cartesian) -> Cartesian,
    ) {
        let mut started = false;
        for segment in self.segments.iter().filter(|segment| include(segment)) {
            if segment.s0 >= target_length {
                break;
            }
            if !started {
                let start = project(segment.p0);
                canvas.move_to(start.x, start.y);
                started = true;
            }
            let end = if segment.s1 <= target_length {
                segment.p1
            } else {
                let t = (target_length - segment.s0) / segment.length();
                Cartesian::new(
                    map_from(t, segment.p0.x, segment.p1.x),
                    map_from(t, segment.p0.y, segment.p1.y),
                )
            };
            let end = project(end);
            canvas.line_to(end.x, end.y);
        }
    }

    /// Reveal windows for every data point when the line is drawn over
    /// `duration` with ease-out-expo, starting after `delay`.
    ///
    /// The window of a segment's first point spans the segment. The final
    /// point shares the window of the last segment.
    #[must_use]
    pub fn timed_points(&self, duration: f64, delay: f64) -> Vec<TimedPoint> {
        let time_at = |s: f64| {
            let fraction = if self.total_length > 0.0 {
                s / self.total_length
            } else {
                1.0
            };
            ease_out_expo_inv(fraction) * duration + delay
        };
        let mut points: Vec<TimedPoint> = self
            .segments
            .iter()
            .map(|segment| TimedPoint {
                id: segment.id,
                key: segment.key,
                position: segment.p0,
                t0: time_at(segment.s0),
                t1: time_at(segment.s1),
            })
            .collect();
        if let Some(last) = points.last().copied()
            && let Some(segment) = self.segments.last()
        {
            points.push(TimedPoint {
                id: PointId::new(last.id.raw() + 1),
                key: self.end_key,
                position: segment.p1,
                ..last
            });
        }
        points
    }
}

/// Scale of point `index` as the line reaches it, overshooting on arrival.
///
/// A point grows while the line crosses the segment leading into it; the
/// first point uses its own window.
#[must_use]
pub fn reveal_scale(points: &[TimedPoint], index: usize, elapsed: f64) -> f64 {
    let Some(window) = reveal_window(points, index) else {
        return 0.0;
    };
    if elapsed >= window.t1 {
        1.0
    } else if elapsed >= window.t0 {
        ease_out_back((elapsed - window.t0) / (window.t1 - window.t0))
    } else {
        0.0
    }
}

/// Whether point `index` has started to appear and may carry a tooltip.
#[must_use]
pub fn is_revealed(points: &[TimedPoint], index: usize, elapsed: f64) -> bool {
    reveal_window(points, index).is_some_and(|window| elapsed > window.t0)
}

fn reveal_window(points: &[TimedPoint], index: usize) -> Option<&TimedPoint> {
    let window = index.checked_sub(1).unwrap_or(index);
    points.get(window)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::render::RecordingCanvas;

    fn path() -> LinePath {
        LinePath::new(&[
            (2000.0, Cartesian::new(0.0, 0.0)),
            (2001.0, Cartesian::new(3.0, 4.0)),
            (2002.0, Cartesian::new(6.0, 8.0)),
        ])
    }

    #[test]
    fn segments_accumulate_length() {
        let path = path();
        assert_eq!(path.segments().len(), 2);
        assert_abs_diff_eq!(path.total_length(), 10.0);
        assert_abs_diff_eq!(path.segments()[1].s0, 5.0);
    }

    #[test]
    fn final_point_is_appended() {
        let points = path().timed_points(1000.0, 100.0);
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].id, PointId::new(2));
        assert_eq!(points[2].position, Cartesian::new(6.0, 8.0));
        assert_abs_diff_eq!(points[2].key, 2002.0);
        assert_abs_diff_eq!(points[0].t0, 100.0);
        assert_abs_diff_eq!(points[1].t1, 1100.0);
    }

    #[test]
    fn zero_duration_reveals_everything_at_the_delay() {
        let points = path().timed_points(0.0, 0.0);
        for index in 0..points.len() {
            assert_eq!(reveal_scale(&points, index, 0.0), 1.0);
            assert!(!is_revealed(&points, index, 0.0));
            assert!(is_revealed(&points, index, 1.0));
        }
    }

    #[test]
    fn tracing_stops_mid_segment() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0).expect("canvas");
        canvas.begin_path();
        path().trace(&mut canvas, 7.5, |_| true, |p| p);
        let frame = canvas.frame();
        assert!(frame.validate().is_ok());
        assert!(!frame.is_empty());
    }
}
