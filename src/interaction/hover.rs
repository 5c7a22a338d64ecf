use ordered_float::OrderedFloat;
use tracing::warn;

use crate::core::math::dist;
use crate::core::{Cartesian, HoverCandidate, PointId};
use crate::error::{ChartError, ChartResult};

/// A drawn mark that can be matched against the pointer.
pub trait Hoverable {
    fn hover_id(&self) -> PointId;
    fn hover_position(&self) -> Cartesian;
    /// Own hit radius, required when no shared max-distance box is used.
    fn hit_radius(&self) -> Option<f64>;
}

impl Hoverable for HoverCandidate {
    fn hover_id(&self) -> PointId {
        self.id
    }

    fn hover_position(&self) -> Cartesian {
        self.position()
    }

    fn hit_radius(&self) -> Option<f64> {
        self.radius
    }
}

/// Resolves the pointer to the nearest qualifying candidate.
///
/// With `max_distance` set (box mode) a candidate qualifies when it lies
/// within the box on both axes, and the winner is the one horizontally
/// closest. Without it (radius mode) every candidate must carry a hit
/// radius, a candidate qualifies when the pointer is within that radius, and
/// the winner is the one closest in euclidean distance. Ties go to the
/// earliest candidate.
pub fn find_hovered_point<T: Hoverable>(
    candidates: &[T],
    pointer: Cartesian,
    max_distance: Option<Cartesian>,
) -> ChartResult<Option<&T>> {
    match max_distance {
        Some(max_distance) => Ok(nearest_in_box(candidates, pointer, max_distance)),
        None => nearest_in_radius(candidates, pointer),
    }
}

fn nearest_in_box<T: Hoverable>(candidates: &[T], pointer: Cartesian, max_distance: Cartesian) -> Option<&T> {
    if candidates.iter().any(|candidate| candidate.hit_radius().is_some()) {
        warn!("hover candidates carry hit radii that box mode ignores");
    }

    candidates
        .iter()
        .filter_map(|candidate| {
            let position = candidate.hover_position();
            let dx = (position.x - pointer.x).abs();
            let dy = (position.y - pointer.y).abs();
            (dx <= max_distance.x && dy <= max_distance.y).then_some((OrderedFloat(dx), candidate))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

fn nearest_in_radius<T: Hoverable>(candidates: &[T], pointer: Cartesian) -> ChartResult<Option<&T>> {
    let mut best: Option<(OrderedFloat<f64>, &T)> = None;
    for candidate in candidates {
        let radius = candidate.hit_radius().ok_or(ChartError::MissingHitRadius {
            id: candidate.hover_id().raw(),
        })?;
        let distance = OrderedFloat(dist(candidate.hover_position(), pointer));
        if distance.0 > radius {
            continue;
        }
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, candidate)),
        }
    }
    Ok(best.map(|(_, candidate)| candidate))
}
