//! Perceptual (OKLCH) colour values.
//!
//! Chart colours are interpolated in OKLCH so ramps between two theme colours
//! stay perceptually even. Values are immutable: every recolouring returns a
//! new [`PerceptualColor`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::math::{clamp, clamp_unit, lerp_hue, map_from};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct PerceptualColor {
    lightness: f64,
    chroma: f64,
    hue: f64,
    alpha: f64,
}

impl PerceptualColor {
    /// Opaque colour; components are clamped into range.
    #[must_use]
    pub fn new(lightness: f64, chroma: f64, hue: f64) -> Self {
        Self::with_components(lightness, chroma, hue, 1.0)
    }

    #[must_use]
    pub fn with_components(lightness: f64, chroma: f64, hue: f64, alpha: f64) -> Self {
        Self {
            lightness: clamp_unit(lightness),
            chroma: clamp_unit(chroma),
            hue: clamp(hue, 0.0, 360.0),
            alpha: clamp_unit(alpha),
        }
    }

    #[must_use]
    pub const fn lightness(self) -> f64 {
        self.lightness
    }

    #[must_use]
    pub const fn chroma(self) -> f64 {
        self.chroma
    }

    #[must_use]
    pub const fn hue(self) -> f64 {
        self.hue
    }

    #[must_use]
    pub const fn alpha(self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::with_components(self.lightness, self.chroma, self.hue, alpha)
    }

    #[must_use]
    pub fn with_lightness(self, lightness: f64) -> Self {
        Self::with_components(lightness, self.chroma, self.hue, self.alpha)
    }

    #[must_use]
    pub fn with_chroma(self, chroma: f64) -> Self {
        Self::with_components(self.lightness, chroma, self.hue, self.alpha)
    }

    #[must_use]
    pub fn scale_lightness(self, factor: f64) -> Self {
        self.with_lightness(self.lightness * factor)
    }

    #[must_use]
    pub fn scale_chroma(self, factor: f64) -> Self {
        self.with_chroma(self.chroma * factor)
    }

    /// Interpolates every component; hue takes the shorter way round.
    #[must_use]
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self::with_components(
            map_from(t, self.lightness, other.lightness),
            map_from(t, self.chroma, other.chroma),
            lerp_hue(self.hue, other.hue, t),
            map_from(t, self.alpha, other.alpha),
        )
    }

    /// Interpolates every component linearly, hue included.
    #[must_use]
    pub fn interpolate_linear_hue(self, other: Self, t: f64) -> Self {
        Self::with_components(
            map_from(t, self.lightness, other.lightness),
            map_from(t, self.chroma, other.chroma),
            map_from(t, self.hue, other.hue),
            map_from(t, self.alpha, other.alpha),
        )
    }

    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }

    /// Converts to gamma-encoded sRGB, clipping out-of-gamut channels.
    #[must_use]
    pub fn to_srgb(self) -> Color {
        let hue = self.hue.to_radians();
        let a = self.chroma * hue.cos();
        let b = self.chroma * hue.sin();
        let l = self.lightness;

        let l_ = (l + 0.396_337_777_4 * a + 0.215_803_757_3 * b).powi(3);
        let m_ = (l - 0.105_561_345_8 * a - 0.063_854_172_8 * b).powi(3);
        let s_ = (l - 0.089_484_177_5 * a - 1.291_485_548_0 * b).powi(3);

        let red = 4.076_741_662_1 * l_ - 3.307_711_591_3 * m_ + 0.230_969_929_2 * s_;
        let green = -1.268_438_004_6 * l_ + 2.609_757_401_1 * m_ - 0.341_319_396_5 * s_;
        let blue = -0.004_196_086_3 * l_ - 0.703_418_614_7 * m_ + 1.707_614_701_0 * s_;

        Color::rgba(
            gamma_encode(red),
            gamma_encode(green),
            gamma_encode(blue),
            self.alpha,
        )
    }
}

fn gamma_encode(linear: f64) -> f64 {
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    clamp_unit(encoded)
}

impl fmt::Display for PerceptualColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "oklch({} {} {} / {})",
            self.lightness, self.chroma, self.hue, self.alpha
        )
    }
}

impl FromStr for PerceptualColor {
    type Err = ChartError;

    /// Accepts `"L C H"`, `"L C H A"`, `"L C H / A"` and the same wrapped in `oklch(...)`.
    fn from_str(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix("oklch(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let components: Vec<f64> = body
            .split(|c: char| c.is_whitespace() || c == '/')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>().map_err(|_| ChartError::NonNumeric {
                    value: part.to_owned(),
                })
            })
            .collect::<ChartResult<_>>()?;

        match components.as_slice() {
            [lightness, chroma, hue] => Ok(Self::new(*lightness, *chroma, *hue)),
            [lightness, chroma, hue, alpha] => {
                Ok(Self::with_components(*lightness, *chroma, *hue, *alpha))
            }
            _ => Err(ChartError::InvalidData(format!(
                "expected 3 or 4 colour components in `{input}`"
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Components {
        lightness: f64,
        chroma: f64,
        hue: f64,
        #[serde(default = "opaque")]
        alpha: f64,
    },
}

fn opaque() -> f64 {
    1.0
}

impl TryFrom<ColorRepr> for PerceptualColor {
    type Error = ChartError;

    fn try_from(value: ColorRepr) -> ChartResult<Self> {
        match value {
            ColorRepr::Css(raw) => raw.parse(),
            ColorRepr::Components {
                lightness,
                chroma,
                hue,
                alpha,
            } => Ok(Self::with_components(lightness, chroma, hue, alpha)),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn css_output_matches_oklch_syntax() {
        let color = PerceptualColor::new(0.5, 0.1, 200.0).with_alpha(0.85);
        assert_eq!(color.to_css(), "oklch(0.5 0.1 200 / 0.85)");
    }

    #[test]
    fn components_are_clamped() {
        let color = PerceptualColor::with_components(1.4, -0.2, 400.0, 2.0);
        assert_eq!(color.lightness(), 1.0);
        assert_eq!(color.chroma(), 0.0);
        assert_eq!(color.hue(), 360.0);
        assert_eq!(color.alpha(), 1.0);
    }

    #[test]
    fn parses_bare_and_wrapped_forms() {
        let bare: PerceptualColor = "0.7 0.12 30".parse().expect("bare");
        assert_eq!(bare, PerceptualColor::new(0.7, 0.12, 30.0));

        let wrapped: PerceptualColor = "oklch(0.7 0.12 30 / 0.5)".parse().expect("wrapped");
        assert_eq!(wrapped, PerceptualColor::with_components(0.7, 0.12, 30.0, 0.5));

        assert!("0.7 red 30".parse::<PerceptualColor>().is_err());
        assert!("0.7".parse::<PerceptualColor>().is_err());
    }

    #[test]
    fn white_and_black_convert_to_srgb_extremes() {
        let white = PerceptualColor::new(1.0, 0.0, 0.0).to_srgb();
        assert_abs_diff_eq!(white.red, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(white.green, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(white.blue, 1.0, epsilon = 1e-3);

        let black = PerceptualColor::new(0.0, 0.0, 0.0).to_srgb();
        assert_abs_diff_eq!(black.red, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn deserializes_from_string_or_components() {
        let from_str: PerceptualColor = serde_json::from_str("\"0.5 0.1 120\"").expect("string");
        let from_obj: PerceptualColor =
            serde_json::from_str(r#"{"lightness":0.5,"chroma":0.1,"hue":120}"#).expect("object");
        assert_eq!(from_str, from_obj);
    }
}
