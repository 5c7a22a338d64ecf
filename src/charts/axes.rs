//! Animated axes, axis labels, grid lines and tick labels shared by the
//! cartesian charts.
//!
//! Every helper wraps its paint changes in `save`/`restore`.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::api::DrawContext;
use crate::core::math::{clamp_unit, ease_in_out_cubic, ease_out_cubic, map_from, unit_progress};
use crate::core::{Cartesian, PerceptualColor, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, Font, Paint, TextBaseline, TextHAlign, scoped};

/// Size of axis labels and tick labels.
pub const LABEL_FONT_SIZE: f64 = 16.0;

/// Animation window of one element: time since it started and how long a
/// single step lasts, both in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub elapsed: f64,
    pub duration: f64,
}

impl Timing {
    #[must_use]
    pub const fn new(elapsed: f64, duration: f64) -> Self {
        Self { elapsed, duration }
    }
}

/// Number of tick labels along each axis; their ratio paces the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCounts {
    pub x: usize,
    pub y: usize,
}

impl TickCounts {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    fn ratio(self) -> f64 {
        self.x as f64 / self.y as f64
    }
}

/// Grows the x axis rightwards and the y axis upwards from the origin.
pub fn axis(
    ctx: &mut DrawContext<'_>,
    ticks: TickCounts,
    timing: Timing,
    stroke: PerceptualColor,
) -> ChartResult<()> {
    let layout = ctx.layout;
    let duration = ticks.x.max(ticks.y) as f64 * timing.duration;
    let eased = ease_in_out_cubic(unit_progress(timing.elapsed, duration));
    let x = map_from(eased, layout.left, layout.right);
    let y = map_from(eased, layout.bottom, layout.top);

    scoped(&mut *ctx.canvas, |canvas| {
        canvas.set_stroke(Paint::Solid(stroke));
        canvas.line(layout.left, layout.bottom, x, layout.bottom)?;
        canvas.line(layout.left, y, layout.left, layout.bottom)
    })
}

/// Fades in the axis titles: `x_label` centred under the plot, `y_label`
/// rotated along the left edge.
pub fn axis_labels(
    ctx: &mut DrawContext<'_>,
    x_label: &str,
    y_label: &str,
    timing: Timing,
) -> ChartResult<()> {
    let layout = ctx.layout;
    let canvas_height = ctx.dimensions.height;
    let alpha = unit_progress(timing.elapsed, timing.duration);
    let color = ctx.color(ThemeColor::Subtext1).with_alpha(alpha);

    scoped(&mut *ctx.canvas, |canvas| {
        canvas.set_fill(Paint::Solid(color));
        canvas.set_font(Font::sans(LABEL_FONT_SIZE));
        canvas.set_text_align(TextHAlign::Center);

        canvas.set_text_baseline(TextBaseline::Bottom);
        canvas.fill_text(x_label, layout.center_x(), canvas_height - 2.0)?;

        canvas.set_text_baseline(TextBaseline::Top);
        scoped(canvas, |canvas| {
            canvas.translate(0.0, layout.bottom / 2.0);
            canvas.rotate(-FRAC_PI_2);
            canvas.fill_text(y_label, 0.0, 0.0)
        })
    })
}

/// Vertical grid lines at pixel positions `xs`, rising one after another.
///
/// Lines alternate between the two colours, starting with `colors[1]`.
pub fn x_axis_grid(
    ctx: &mut DrawContext<'_>,
    xs: &[f64],
    colors: [PerceptualColor; 2],
    timing: Timing,
) -> ChartResult<()> {
    if xs.is_empty() {
        return Ok(());
    }
    let layout = ctx.layout;
    let n = xs.len() as f64;
    let eased_global = ease_in_out_cubic(unit_progress(timing.elapsed, n * timing.duration));
    let slot = 1.0 / n;

    scoped(&mut *ctx.canvas, |canvas| {
        for (i, &x) in xs.iter().enumerate() {
            let color = if i % 2 == 0 { colors[1] } else { colors[0] };
            canvas.set_stroke(Paint::Solid(color));
            let local = clamp_unit((eased_global - i as f64 * slot) / slot);
            let y = map_from(ease_out_cubic(local), layout.bottom, layout.top);
            canvas.line(x, layout.bottom, x, y)?;
        }
        Ok(())
    })
}

/// Horizontal grid lines at the `ticks.y` evenly spaced values between
/// `min` and `max`, skipping the one on the x axis.
pub fn y_axis_grid(
    ctx: &mut DrawContext<'_>,
    ticks: TickCounts,
    (min, max): (f64, f64),
    to_y: impl Fn(f64) -> f64,
    timing: Timing,
    stroke: PerceptualColor,
) -> ChartResult<()> {
    let n = require_two_ticks(ticks.y)?;
    let layout = ctx.layout;
    let total = timing.duration * ticks.ratio() * n as f64;
    let eased_global = ease_in_out_cubic(unit_progress(timing.elapsed, total));
    let slot = 1.0 / n as f64;

    scoped(&mut *ctx.canvas, |canvas| {
        canvas.set_stroke(Paint::Solid(stroke));
        for i in 1..n {
            let y = to_y(tick_value(min, max, i, n));
            let local = clamp_unit((eased_global - i as f64 * slot) / slot);
            let x = map_from(ease_out_cubic(local), layout.left, layout.right);
            canvas.line(layout.left, y, x, y)?;
        }
        Ok(())
    })
}

/// Fades in labels below the x axis one after another.
///
/// `labels` pairs each text with its pixel x. Rotated labels are nudged by a
/// quarter of their width so they hang under their tick.
pub fn x_axis_tick_labels(
    ctx: &mut DrawContext<'_>,
    padding: f64,
    labels: &[(String, f64)],
    timing: Timing,
    rotation_deg: f64,
) -> ChartResult<()> {
    let bottom = ctx.layout.bottom;
    let color = ctx.color(ThemeColor::Overlay1);
    let last = labels.len().saturating_sub(1);

    for (i, (text, x)) in labels.iter().enumerate() {
        let progress = unit_progress(timing.elapsed - i as f64 * timing.duration, timing.duration);
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_font(Font::sans(LABEL_FONT_SIZE));
            canvas.set_text_baseline(TextBaseline::Middle);
            canvas.set_text_align(if i == last && rotation_deg == 0.0 {
                TextHAlign::Right
            } else {
                TextHAlign::Center
            });
            let width = canvas.measure_text(text)?.width;
            let x_offset = if rotation_deg == 0.0 {
                0.0
            } else {
                width / 4.0 * rotation_deg.signum()
            };
            canvas.translate(x + x_offset, bottom + padding * 0.7);
            canvas.rotate(rotation_deg.to_radians());
            canvas.set_fill(Paint::Solid(color.with_alpha(progress)));
            canvas.fill_text(text, 0.0, 0.0)
        })?;
    }
    Ok(())
}

/// Options for [`y_axis_tick_labels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YTickStyle {
    pub decimals: usize,
    /// Fade in from the last value to the first.
    pub inverse: bool,
}

/// Fades in `ticks.y` evenly spaced value labels left of the y axis.
pub fn y_axis_tick_labels(
    ctx: &mut DrawContext<'_>,
    padding: f64,
    ticks: TickCounts,
    (min, max): (f64, f64),
    to_y: impl Fn(f64) -> f64,
    timing: Timing,
    style: YTickStyle,
) -> ChartResult<()> {
    let n = require_two_ticks(ticks.y)?;
    let x = ctx.layout.left - padding / 4.0;
    let color = ctx.color(ThemeColor::Overlay1);

    scoped(&mut *ctx.canvas, |canvas| {
        canvas.set_font(Font::sans(LABEL_FONT_SIZE));
        canvas.set_text_align(TextHAlign::Right);
        for i in 0..n {
            let value = tick_value(min, max, i, n);
            canvas.set_text_baseline(if i == 0 {
                TextBaseline::Bottom
            } else if i == n - 1 {
                TextBaseline::Top
            } else {
                TextBaseline::Middle
            });
            let order = if style.inverse { n - i - 1 } else { i };
            let start = timing.duration * order as f64 * ticks.ratio();
            let alpha = unit_progress(timing.elapsed - start, timing.duration);
            canvas.set_fill(Paint::Solid(color.with_alpha(alpha)));
            canvas.fill_text(&format!("{value:.*}", style.decimals), x, to_y(value))?;
        }
        Ok(())
    })
}

/// Fills a circle with the current fill, then strokes it when `stroke` is given.
pub fn point(
    canvas: &mut dyn Canvas,
    radius: f64,
    center: Cartesian,
    stroke: Option<PerceptualColor>,
) -> ChartResult<()> {
    canvas.begin_path();
    canvas.arc(center.x, center.y, radius.max(0.0), 0.0, TAU, false);
    canvas.fill()?;
    if let Some(stroke) = stroke {
        canvas.set_stroke(Paint::Solid(stroke));
        canvas.stroke()?;
    }
    Ok(())
}

fn tick_value(min: f64, max: f64, i: usize, n: usize) -> f64 {
    min + i as f64 * ((max - min) / (n - 1) as f64)
}

fn require_two_ticks(n: usize) -> ChartResult<usize> {
    if n < 2 {
        return Err(ChartError::InvalidData(format!(
            "a value axis needs at least two ticks, got {n}"
        )));
    }
    Ok(n)
}
