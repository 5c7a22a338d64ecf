//! Named theme colours for light and dark mode.
//!
//! Colours are looked up on every call against the live [`Environment`], so a
//! theme toggle or a contrast preference change is picked up on the next frame.

use serde::{Deserialize, Serialize};

use crate::api::Environment;
use crate::core::PerceptualColor;

/// Palette entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeColor {
    Rosewater,
    Flamingo,
    Pink,
    Mauve,
    Red,
    Maroon,
    Peach,
    Yellow,
    Green,
    Teal,
    Sky,
    Sapphire,
    Blue,
    Lavender,
    /// Body text; resolves to the high-contrast text colour when increased contrast is preferred.
    Text,
    Subtext1,
    Subtext0,
    Overlay2,
    Overlay1,
    Overlay0,
    Surface2,
    Surface1,
    Surface0,
    Base,
    Mantle,
    Crust,
    White,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub rosewater: PerceptualColor,
    pub flamingo: PerceptualColor,
    pub pink: PerceptualColor,
    pub mauve: PerceptualColor,
    pub red: PerceptualColor,
    pub maroon: PerceptualColor,
    pub peach: PerceptualColor,
    pub yellow: PerceptualColor,
    pub green: PerceptualColor,
    pub teal: PerceptualColor,
    pub sky: PerceptualColor,
    pub sapphire: PerceptualColor,
    pub blue: PerceptualColor,
    pub lavender: PerceptualColor,
    pub text: PerceptualColor,
    pub hc_text: PerceptualColor,
    pub subtext1: PerceptualColor,
    pub subtext0: PerceptualColor,
    pub overlay2: PerceptualColor,
    pub overlay1: PerceptualColor,
    pub overlay0: PerceptualColor,
    pub surface2: PerceptualColor,
    pub surface1: PerceptualColor,
    pub surface0: PerceptualColor,
    pub base: PerceptualColor,
    pub mantle: PerceptualColor,
    pub crust: PerceptualColor,
}

impl Palette {
    #[must_use]
    pub fn get(&self, color: ThemeColor, contrast_more: bool) -> PerceptualColor {
        match color {
            ThemeColor::Rosewater => self.rosewater,
            ThemeColor::Flamingo => self.flamingo,
            ThemeColor::Pink => self.pink,
            ThemeColor::Mauve => self.mauve,
            ThemeColor::Red => self.red,
            ThemeColor::Maroon => self.maroon,
            ThemeColor::Peach => self.peach,
            ThemeColor::Yellow => self.yellow,
            ThemeColor::Green => self.green,
            ThemeColor::Teal => self.teal,
            ThemeColor::Sky => self.sky,
            ThemeColor::Sapphire => self.sapphire,
            ThemeColor::Blue => self.blue,
            ThemeColor::Lavender => self.lavender,
            ThemeColor::Text if contrast_more => self.hc_text,
            ThemeColor::Text => self.text,
            ThemeColor::Subtext1 => self.subtext1,
            ThemeColor::Subtext0 => self.subtext0,
            ThemeColor::Overlay2 => self.overlay2,
            ThemeColor::Overlay1 => self.overlay1,
            ThemeColor::Overlay0 => self.overlay0,
            ThemeColor::Surface2 => self.surface2,
            ThemeColor::Surface1 => self.surface1,
            ThemeColor::Surface0 => self.surface0,
            ThemeColor::Base => self.base,
            ThemeColor::Mantle => self.mantle,
            ThemeColor::Crust => self.crust,
            ThemeColor::White => PerceptualColor::new(1.0, 0.0, 0.0),
        }
    }

    /// Pastel light palette.
    #[must_use]
    pub fn latte() -> Self {
        Self {
            rosewater: PerceptualColor::new(0.714, 0.105, 33.1),
            flamingo: PerceptualColor::new(0.686, 0.126, 20.9),
            pink: PerceptualColor::new(0.726, 0.174, 338.4),
            mauve: PerceptualColor::new(0.555, 0.250, 297.0),
            red: PerceptualColor::new(0.550, 0.216, 19.8),
            maroon: PerceptualColor::new(0.625, 0.197, 20.3),
            peach: PerceptualColor::new(0.692, 0.204, 42.4),
            yellow: PerceptualColor::new(0.714, 0.149, 67.8),
            green: PerceptualColor::new(0.625, 0.177, 140.4),
            teal: PerceptualColor::new(0.602, 0.098, 201.1),
            sky: PerceptualColor::new(0.682, 0.145, 235.4),
            sapphire: PerceptualColor::new(0.648, 0.107, 212.9),
            blue: PerceptualColor::new(0.559, 0.226, 262.1),
            lavender: PerceptualColor::new(0.664, 0.175, 273.1),
            text: PerceptualColor::new(0.435, 0.043, 279.3),
            hc_text: PerceptualColor::new(0.0, 0.0, 0.0),
            subtext1: PerceptualColor::new(0.492, 0.038, 279.3),
            subtext0: PerceptualColor::new(0.547, 0.034, 279.1),
            overlay2: PerceptualColor::new(0.601, 0.030, 278.7),
            overlay1: PerceptualColor::new(0.654, 0.027, 278.1),
            overlay0: PerceptualColor::new(0.708, 0.024, 274.6),
            surface2: PerceptualColor::new(0.758, 0.020, 273.2),
            surface1: PerceptualColor::new(0.808, 0.017, 271.2),
            surface0: PerceptualColor::new(0.857, 0.014, 268.5),
            base: PerceptualColor::new(0.958, 0.006, 264.5),
            mantle: PerceptualColor::new(0.933, 0.009, 264.5),
            crust: PerceptualColor::new(0.906, 0.012, 264.5),
        }
    }

    /// Pastel dark palette.
    #[must_use]
    pub fn mocha() -> Self {
        Self {
            rosewater: PerceptualColor::new(0.923, 0.024, 30.5),
            flamingo: PerceptualColor::new(0.880, 0.042, 18.0),
            pink: PerceptualColor::new(0.870, 0.075, 336.3),
            mauve: PerceptualColor::new(0.787, 0.119, 304.8),
            red: PerceptualColor::new(0.756, 0.130, 2.8),
            maroon: PerceptualColor::new(0.782, 0.090, 8.8),
            peach: PerceptualColor::new(0.824, 0.101, 52.6),
            yellow: PerceptualColor::new(0.919, 0.070, 86.5),
            green: PerceptualColor::new(0.858, 0.109, 142.7),
            teal: PerceptualColor::new(0.858, 0.079, 182.7),
            sky: PerceptualColor::new(0.847, 0.083, 210.3),
            sapphire: PerceptualColor::new(0.791, 0.096, 228.7),
            blue: PerceptualColor::new(0.766, 0.111, 259.9),
            lavender: PerceptualColor::new(0.817, 0.091, 277.3),
            text: PerceptualColor::new(0.879, 0.043, 272.3),
            hc_text: PerceptualColor::new(1.0, 0.0, 0.0),
            subtext1: PerceptualColor::new(0.817, 0.040, 272.9),
            subtext0: PerceptualColor::new(0.751, 0.040, 273.9),
            overlay2: PerceptualColor::new(0.687, 0.037, 274.7),
            overlay1: PerceptualColor::new(0.618, 0.037, 276.0),
            overlay0: PerceptualColor::new(0.550, 0.034, 277.1),
            surface2: PerceptualColor::new(0.477, 0.034, 278.6),
            surface1: PerceptualColor::new(0.404, 0.032, 280.2),
            surface0: PerceptualColor::new(0.324, 0.032, 282.0),
            base: PerceptualColor::new(0.243, 0.030, 283.9),
            mantle: PerceptualColor::new(0.216, 0.025, 284.1),
            crust: PerceptualColor::new(0.183, 0.020, 284.2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "Palette::latte")]
    pub light: Palette,
    #[serde(default = "Palette::mocha")]
    pub dark: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            light: Palette::latte(),
            dark: Palette::mocha(),
        }
    }
}

impl Theme {
    /// Palette for the environment's current mode.
    #[must_use]
    pub fn palette(&self, env: &dyn Environment) -> &Palette {
        if env.is_dark() { &self.dark } else { &self.light }
    }

    #[must_use]
    pub fn color(&self, env: &dyn Environment, color: ThemeColor) -> PerceptualColor {
        self.palette(env).get(color, env.prefers_contrast_more())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticEnvironment;

    #[test]
    fn text_follows_contrast_preference_live() {
        let theme = Theme::default();
        let env = StaticEnvironment::default();
        assert_eq!(theme.color(&env, ThemeColor::Text), theme.light.text);

        env.set_contrast_more(true);
        assert_eq!(theme.color(&env, ThemeColor::Text), theme.light.hc_text);

        env.set_dark(true);
        assert_eq!(theme.color(&env, ThemeColor::Text), theme.dark.hc_text);
        assert_eq!(theme.color(&env, ThemeColor::Base), theme.dark.base);
    }

    #[test]
    fn missing_palette_falls_back_to_default() {
        let partial: Theme = serde_json::from_str("{}").expect("empty theme");
        assert_eq!(partial.dark, Palette::mocha());
    }
}
