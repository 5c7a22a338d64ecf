use approx::assert_abs_diff_eq;
use chart_gallery::core::math::{
    clamp_unit, ease_out_back, ease_out_cubic, ease_out_cubic_inv, ease_out_elastic, ease_out_expo,
    ease_out_expo_inv, ease_out_quart, lerp, lerp_hue, map, map_from, map_to, unit_progress,
};
use chart_gallery::core::{Easing, PerceptualColor};
use proptest::prelude::*;

fn every_easing() -> impl Iterator<Item = Easing> {
    Easing::ALL_FIXED.into_iter().chain([Easing::elastic()])
}

#[test]
fn every_easing_starts_at_zero_and_ends_at_one() {
    for easing in every_easing() {
        assert_abs_diff_eq!(easing.apply(0.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(easing.apply(1.0), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn only_back_and_elastic_are_marked_as_overshooting() {
    let overshooting: Vec<Easing> = every_easing().filter(|easing| easing.overshoots()).collect();
    assert_eq!(overshooting, [Easing::EaseOutBack, Easing::elastic()]);
}

proptest! {
    #[test]
    fn map_round_trip_property(
        start in -10_000.0f64..10_000.0,
        span in 0.001f64..10_000.0,
        factor in 0.0f64..1.0
    ) {
        let stop = start + span;
        let value = start + factor * span;
        let px = map(value, start, stop, 40.0, 980.0);
        let recovered = map(px, 40.0, 980.0, start, stop);
        prop_assert!((recovered - value).abs() <= 1e-6);
    }

    #[test]
    fn map_to_and_map_from_compose_into_map(
        start in -10_000.0f64..10_000.0,
        span in 0.001f64..10_000.0,
        factor in 0.0f64..1.0
    ) {
        let stop = start + span;
        let value = start + factor * span;
        let unit = map_to(value, start, stop);
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&unit));
        prop_assert!((map_from(unit, start, stop) - value).abs() <= 1e-6);
        prop_assert!((map_from(unit, 40.0, 980.0) - map(value, start, stop, 40.0, 980.0)).abs() <= 1e-6);
    }

    #[test]
    fn back_overshoot_is_bounded(x in 0.0f64..=1.0) {
        let y = ease_out_back(x);
        prop_assert!(y >= -1e-9);
        prop_assert!(y <= 1.1 + 1e-4);
    }

    #[test]
    fn elastic_oscillation_decays(x in 0.0f64..=1.0) {
        let y = ease_out_elastic(x);
        prop_assert!((y - 1.0).abs() <= 2f64.powf(-10.0 * x) + 1e-12);
        prop_assert!((0.0..=1.5).contains(&y));
    }

    #[test]
    fn lerp_never_passes_its_target(a in -1_000.0f64..1_000.0, b in -1_000.0f64..1_000.0, t in 0.0f64..100.0) {
        let value = lerp(a, b, t);
        prop_assert!(value >= a.min(b) - 1e-9 && value <= a.max(b) + 1e-9);
    }

    #[test]
    fn unit_progress_stays_in_unit_range(elapsed in -1e6f64..1e6, duration in -10.0f64..1e4) {
        let progress = unit_progress(elapsed, duration);
        prop_assert!((0.0..=1.0).contains(&progress));
        if duration <= 0.0 {
            prop_assert_eq!(progress, 1.0);
        }
    }

    #[test]
    fn easings_keep_their_endpoints_and_stay_monotonic(x in 0.0f64..1.0, dx in 0.0f64..0.1) {
        let y = (x + dx).min(1.0);
        for easing in [ease_out_cubic, ease_out_quart, ease_out_expo] {
            prop_assert!(easing(x) <= easing(y) + 1e-12);
        }
        prop_assert!(ease_out_cubic(0.0).abs() <= 1e-12);
        prop_assert!((ease_out_quart(1.0) - 1.0).abs() <= 1e-12);
        prop_assert!((ease_out_back(1.0) - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn inverse_easings_undo_their_curve(x in 0.0f64..0.95) {
        prop_assert!((ease_out_expo_inv(ease_out_expo(x)) - x).abs() <= 1e-9);
        prop_assert!((ease_out_cubic_inv(ease_out_cubic(x)) - x).abs() <= 1e-9);
    }

    #[test]
    fn hue_interpolation_takes_the_short_way(from in 0.0f64..360.0, to in 0.0f64..360.0, t in 0.0f64..1.0) {
        let hue = lerp_hue(from, to, t);
        prop_assert!((0.0..=360.0).contains(&hue));
        let travelled = (hue - from + 540.0).rem_euclid(360.0) - 180.0;
        prop_assert!(travelled.abs() <= 180.0 + 1e-9);
    }

    #[test]
    fn colour_components_are_clamped(l in -2.0f64..2.0, c in -1.0f64..1.0, h in -720.0f64..720.0, a in -1.0f64..2.0) {
        let color = PerceptualColor::with_components(l, c, h, a);
        prop_assert!((0.0..=1.0).contains(&color.lightness()));
        prop_assert!(color.chroma() >= 0.0);
        prop_assert!((0.0..=360.0).contains(&color.hue()));
        prop_assert!((0.0..=1.0).contains(&color.alpha()));
        prop_assert_eq!(clamp_unit(color.alpha()), color.alpha());
    }
}
