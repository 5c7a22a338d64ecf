use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PerceptualColor;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values, as consumed by raster backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl From<PerceptualColor> for Color {
    fn from(value: PerceptualColor) -> Self {
        value.to_srgb()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: PerceptualColor,
}

/// Linear gradient between two canvas-space points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stops: SmallVec<[GradientStop; 8]>,
}

impl LinearGradient {
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: SmallVec::new(),
        }
    }

    /// Adds a stop; offsets are clamped into `[0, 1]`.
    #[must_use]
    pub fn with_stop(mut self, offset: f64, color: PerceptualColor) -> Self {
        self.add_stop(offset, color);
        self
    }

    pub fn add_stop(&mut self, offset: f64, color: PerceptualColor) {
        self.stops.push(GradientStop {
            offset: crate::core::math::clamp_unit(offset),
            color,
        });
    }
}

/// Fill or stroke source.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(PerceptualColor),
    LinearGradient(LinearGradient),
}

impl Paint {
    /// Color of a solid paint, `None` for gradients.
    #[must_use]
    pub fn solid_color(&self) -> Option<PerceptualColor> {
        match self {
            Paint::Solid(color) => Some(*color),
            Paint::LinearGradient(_) => None,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(PerceptualColor::new(0.0, 0.0, 0.0))
    }
}

impl From<PerceptualColor> for Paint {
    fn from(value: PerceptualColor) -> Self {
        Paint::Solid(value)
    }
}

impl From<LinearGradient> for Paint {
    fn from(value: LinearGradient) -> Self {
        Paint::LinearGradient(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    Serif,
    #[default]
    SansSerif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size_px: f64,
    pub weight: FontWeight,
    pub family: FontFamily,
}

impl Font {
    /// Regular sans-serif font, the default for labels.
    #[must_use]
    pub const fn sans(size_px: f64) -> Self {
        Self {
            size_px,
            weight: FontWeight::Normal,
            family: FontFamily::SansSerif,
        }
    }

    #[must_use]
    pub const fn serif(size_px: f64) -> Self {
        Self {
            size_px,
            weight: FontWeight::Normal,
            family: FontFamily::Serif,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::sans(10.0)
    }
}

/// Horizontal text alignment relative to the text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Per-corner radii of a rounded rectangle, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    #[must_use]
    pub const fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// Radii for a bar growing from its left edge: only the right corners are rounded.
    #[must_use]
    pub const fn right(radius: f64) -> Self {
        Self {
            top_left: 0.0,
            top_right: radius,
            bottom_right: radius,
            bottom_left: 0.0,
        }
    }

    #[must_use]
    pub const fn left(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: 0.0,
            bottom_right: 0.0,
            bottom_left: radius,
        }
    }

    /// Shrinks every radius so opposite corners never overlap on a `width` x `height` box.
    #[must_use]
    pub fn fitted(self, width: f64, height: f64) -> Self {
        let limit = (width.abs() / 2.0).min(height.abs() / 2.0).max(0.0);
        Self {
            top_left: self.top_left.clamp(0.0, limit),
            top_right: self.top_right.clamp(0.0, limit),
            bottom_right: self.bottom_right.clamp(0.0, limit),
            bottom_left: self.bottom_left.clamp(0.0, limit),
        }
    }
}

/// Rendered extent of a text run in the current font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    /// Distance from the alphabetic baseline to the top of the inked box.
    pub ascent: f64,
    /// Distance from the alphabetic baseline to the bottom of the inked box.
    pub descent: f64,
}

impl TextMetrics {
    #[must_use]
    pub fn height(self) -> f64 {
        self.ascent + self.descent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_radii_are_fitted_to_the_box() {
        let radii = CornerRadii::uniform(20.0).fitted(10.0, 30.0);
        assert_eq!(radii, CornerRadii::uniform(5.0));

        let negative = CornerRadii::right(8.0).fitted(-12.0, 18.0);
        assert_eq!(negative.top_right, 6.0);
        assert_eq!(negative.top_left, 0.0);
    }

    #[test]
    fn gradient_stop_offsets_are_clamped() {
        let gradient = LinearGradient::new(0.0, 0.0, 10.0, 0.0)
            .with_stop(-0.5, PerceptualColor::new(0.5, 0.1, 10.0))
            .with_stop(1.5, PerceptualColor::new(0.5, 0.1, 20.0));
        assert_eq!(gradient.stops[0].offset, 0.0);
        assert_eq!(gradient.stops[1].offset, 1.0);
    }
}
