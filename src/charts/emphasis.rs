//! Per-mark hover emphasis eased towards a target every frame.

use crate::api::DrawContext;
use crate::charts::axes::point;
use crate::core::math::lerp;
use crate::core::{Cartesian, PerceptualColor, ThemeColor};
use crate::error::ChartResult;
use crate::render::{Paint, scoped};

/// Which emphasis a line point should move towards this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisTarget {
    /// The pointer is outside the plot: every point is shown faintly filled.
    OutsidePlot,
    Hovered,
    Idle,
}

impl EmphasisTarget {
    #[must_use]
    pub fn resolve(mouse_in_plot: bool, hovered: bool) -> Self {
        if !mouse_in_plot {
            EmphasisTarget::OutsidePlot
        } else if hovered {
            EmphasisTarget::Hovered
        } else {
            EmphasisTarget::Idle
        }
    }

    fn values(self) -> PointEmphasis {
        match self {
            EmphasisTarget::OutsidePlot => PointEmphasis {
                scale: 0.9,
                fill_alpha: 0.4,
                stroke_alpha: 0.45,
            },
            EmphasisTarget::Hovered => PointEmphasis {
                scale: 1.5,
                fill_alpha: 1.0,
                stroke_alpha: 1.0,
            },
            EmphasisTarget::Idle => PointEmphasis {
                scale: 1.0,
                fill_alpha: 0.0,
                stroke_alpha: 0.25,
            },
        }
    }
}

/// Scale and alphas of one line point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEmphasis {
    pub scale: f64,
    pub fill_alpha: f64,
    pub stroke_alpha: f64,
}

impl Default for PointEmphasis {
    fn default() -> Self {
        Self {
            scale: 1.0,
            fill_alpha: 0.0,
            stroke_alpha: 0.0,
        }
    }
}

impl PointEmphasis {
    /// Moves towards `target` by `factor` and returns the values from before
    /// the step, which are the ones drawn this frame.
    pub fn step(&mut self, target: EmphasisTarget, factor: f64) -> Self {
        let current = *self;
        let goal = target.values();
        self.scale = lerp(current.scale, goal.scale, factor);
        self.fill_alpha = lerp(current.fill_alpha, goal.fill_alpha, factor);
        self.stroke_alpha = lerp(current.stroke_alpha, goal.stroke_alpha, factor);
        current
    }
}

/// A single eased opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade(f64);

impl Fade {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Moves towards `target` and returns the value from before the step.
    pub fn step(&mut self, target: f64, factor: f64) -> f64 {
        let current = self.0;
        self.0 = lerp(current, target, factor);
        current
    }
}

/// Colours of a line point in its idle and hovered states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPalette {
    pub fill: PerceptualColor,
    pub stroke: PerceptualColor,
    pub hovered_fill: PerceptualColor,
    pub hovered_stroke: PerceptualColor,
}

impl PointPalette {
    /// Derives point colours from the line colour at the point. When
    /// `keep_idle_chroma` is set the idle stroke only adjusts lightness.
    #[must_use]
    pub fn from_line_color(
        ctx: &DrawContext<'_>,
        base: PerceptualColor,
        keep_idle_chroma: bool,
    ) -> Self {
        let dark = ctx.is_dark();
        let lightness = base.lightness() * if dark { 1.1 } else { 0.85 };
        let chroma = base.chroma() * if dark { 0.7 } else { 1.2 };
        let mantle = ctx.color(ThemeColor::Mantle);
        let hovered_stroke = base.with_lightness(lightness).with_chroma(chroma);
        Self {
            fill: mantle.scale_lightness(1.2),
            stroke: if keep_idle_chroma {
                base.with_lightness(lightness)
            } else {
                hovered_stroke
            },
            hovered_fill: base,
            hovered_stroke,
        }
    }

    /// Draws a point with the colours for `target` and the emphasis drawn
    /// this frame; `radius` is before emphasis scaling.
    pub fn draw_point(
        &self,
        ctx: &mut DrawContext<'_>,
        center: Cartesian,
        radius: f64,
        target: EmphasisTarget,
        emphasis: PointEmphasis,
    ) -> ChartResult<()> {
        let (fill, stroke) = match target {
            EmphasisTarget::Hovered => (self.hovered_fill, self.hovered_stroke),
            EmphasisTarget::OutsidePlot | EmphasisTarget::Idle => (self.fill, self.stroke),
        };
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_fill(Paint::Solid(fill.with_alpha(emphasis.fill_alpha)));
            canvas.set_line_width(2.0);
            point(
                canvas,
                radius * emphasis.scale,
                center,
                Some(stroke.with_alpha(emphasis.stroke_alpha)),
            )
        })
    }
}
