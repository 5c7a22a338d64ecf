use std::f64::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use chart_gallery::ChartError;
use chart_gallery::core::{Cartesian, HoverCandidate, PointId, Polar};
use chart_gallery::interaction::{Hoverable, find_hovered_point};
use proptest::prelude::*;

/// A bubble that carries its own size, like the pay-gap-by-job dots.
struct Bubble {
    id: usize,
    center: Cartesian,
    size: f64,
}

impl Hoverable for Bubble {
    fn hover_id(&self) -> PointId {
        PointId::new(self.id)
    }

    fn hover_position(&self) -> Cartesian {
        self.center
    }

    fn hit_radius(&self) -> Option<f64> {
        Some(self.size / 2.0)
    }
}

#[test]
fn box_mode_picks_the_horizontally_nearest_year() {
    let candidates: Vec<HoverCandidate> = [10.0, 20.0, 30.0]
        .into_iter()
        .enumerate()
        .map(|(index, x)| HoverCandidate::new(PointId::new(index), x, 0.0))
        .collect();

    let hovered = find_hovered_point(&candidates, Cartesian::new(21.0, 0.0), Some(Cartesian::new(15.0, 5.0)))
        .expect("box search")
        .expect("within the box");
    assert_eq!(hovered.x, 20.0);
    assert_eq!(hovered.id, PointId::new(1));
}

#[test]
fn radius_mode_hits_only_inside_the_radius() {
    let candidates = [HoverCandidate::new(PointId::new(0), 0.0, 0.0).with_radius(5.0)];

    let hit = find_hovered_point(&candidates, Cartesian::new(4.0, 0.0), None).expect("radius search");
    assert_eq!(hit.map(|candidate| candidate.id), Some(PointId::new(0)));

    let miss = find_hovered_point(&candidates, Cartesian::new(6.0, 0.0), None).expect("radius search");
    assert!(miss.is_none());
}

#[test]
fn custom_marks_resolve_through_their_own_radius() {
    let bubbles = [
        Bubble { id: 0, center: Cartesian::new(100.0, 100.0), size: 40.0 },
        Bubble { id: 1, center: Cartesian::new(130.0, 100.0), size: 10.0 },
    ];

    let hovered = find_hovered_point(&bubbles, Cartesian::new(118.0, 100.0), None)
        .expect("radius search")
        .expect("inside the large bubble");
    assert_eq!(hovered.hover_id(), PointId::new(0));

    let miss = find_hovered_point(&bubbles, Cartesian::new(124.0, 100.0), None).expect("radius search");
    assert!(miss.is_none());
}

#[test]
fn radius_mode_rejects_marks_without_a_radius() {
    let candidates = [
        HoverCandidate::new(PointId::new(0), 10.0, 10.0).with_radius(4.0),
        HoverCandidate::new(PointId::new(9), 50.0, 50.0),
    ];
    let err = find_hovered_point(&candidates, Cartesian::new(10.0, 10.0), None)
        .expect_err("second candidate has no radius");
    assert!(matches!(err, ChartError::MissingHitRadius { id: 9 }));
}

#[test]
fn polar_candidates_keep_their_identity_around_a_center() {
    let center = Cartesian::new(200.0, 150.0);
    let candidate = HoverCandidate::from_point(PointId::new(3), Polar::new(80.0, FRAC_PI_2), center);

    assert_eq!(candidate.id, PointId::new(3));
    assert_abs_diff_eq!(candidate.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(candidate.y, 230.0, epsilon = 1e-9);

    let candidates = [candidate];
    let hovered = find_hovered_point(&candidates, Cartesian::new(205.0, 225.0), Some(Cartesian::splat(10.0)))
        .expect("box search")
        .expect("within the box");
    assert_eq!(hovered.id, PointId::new(3));
}

proptest! {
    #[test]
    fn box_mode_only_returns_candidates_inside_the_box(
        xs in prop::collection::vec(0.0f64..1_000.0, 1..64),
        pointer_x in 0.0f64..1_000.0,
        half_width in 1.0f64..200.0
    ) {
        let candidates: Vec<HoverCandidate> = xs
            .iter()
            .enumerate()
            .map(|(i, x)| HoverCandidate::new(PointId::new(i), *x, 300.0))
            .collect();
        let pointer = Cartesian::new(pointer_x, 310.0);
        let hovered = find_hovered_point(&candidates, pointer, Some(Cartesian::new(half_width, 20.0)))
            .expect("box search");

        match hovered {
            Some(hovered) => {
                let distance = (hovered.x - pointer_x).abs();
                prop_assert!(distance <= half_width);
                prop_assert!(candidates.iter().all(|c| (c.x - pointer_x).abs() >= distance));
            }
            None => prop_assert!(candidates.iter().all(|c| (c.x - pointer_x).abs() > half_width)),
        }
    }
}
