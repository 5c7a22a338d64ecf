use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::Environment;
use crate::core::Dimensions;
use crate::error::{ChartError, ChartResult};

/// Gallery bootstrap configuration.
///
/// Serializable so hosts can ship a JSON file instead of hard-coding sizes and
/// data locations. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default)]
    pub dimensions: Dimensions,
    /// Base inset unit; chart margins are multiples of it.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Duration of one animation step in milliseconds.
    #[serde(default = "default_animation_cycle_ms")]
    pub animation_cycle_ms: f64,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f64,
    #[serde(default = "default_gender_chart_height")]
    pub gender_chart_height: f64,
    #[serde(default = "default_race_chart_width")]
    pub race_chart_width: f64,
    /// Seed for the bubble entry order; `None` shuffles from entropy.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    /// Index of the chart activated when the gallery opens.
    #[serde(default)]
    pub initial_chart: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            padding: default_padding(),
            animation_cycle_ms: default_animation_cycle_ms(),
            data_dir: default_data_dir(),
            title_font_size: default_title_font_size(),
            gender_chart_height: default_gender_chart_height(),
            race_chart_width: default_race_chart_width(),
            shuffle_seed: None,
            initial_chart: 0,
        }
    }
}

impl GalleryConfig {
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_animation_cycle_ms(mut self, animation_cycle_ms: f64) -> Self {
        self.animation_cycle_ms = animation_cycle_ms;
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_initial_chart(mut self, index: usize) -> Self {
        self.initial_chart = index;
        self
    }

    /// Animation step for the current environment; zero under reduced motion.
    #[must_use]
    pub fn animation_cycle(&self, env: &dyn Environment) -> f64 {
        if env.prefers_reduced_motion() {
            0.0
        } else {
            self.animation_cycle_ms
        }
    }

    /// Dimensions of the taller gender chart.
    #[must_use]
    pub fn gender_dimensions(&self) -> Dimensions {
        Dimensions::new(self.dimensions.width, self.gender_chart_height)
    }

    /// Dimensions of the narrower race chart.
    #[must_use]
    pub fn race_dimensions(&self) -> Dimensions {
        Dimensions::new(self.race_chart_width, self.dimensions.height)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for dimensions in [self.dimensions, self.gender_dimensions(), self.race_dimensions()] {
            if !dimensions.is_valid() {
                return Err(ChartError::InvalidViewport {
                    width: dimensions.width,
                    height: dimensions.height,
                });
            }
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ChartError::Config(format!(
                "padding must be finite and >= 0, got {}",
                self.padding
            )));
        }
        if !self.animation_cycle_ms.is_finite() || self.animation_cycle_ms < 0.0 {
            return Err(ChartError::Config(format!(
                "animation cycle must be finite and >= 0, got {}",
                self.animation_cycle_ms
            )));
        }
        if !self.title_font_size.is_finite() || self.title_font_size <= 0.0 {
            return Err(ChartError::Config(format!(
                "title font size must be finite and > 0, got {}",
                self.title_font_size
            )));
        }
        Ok(())
    }

    pub fn resolve_data_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(relative)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::Config(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

fn default_padding() -> f64 {
    35.0
}

fn default_animation_cycle_ms() -> f64 {
    40.0
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_title_font_size() -> f64 {
    crate::core::DEFAULT_TITLE_FONT_SIZE
}

fn default_gender_chart_height() -> f64 {
    768.0
}

fn default_race_chart_width() -> f64 {
    720.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticEnvironment;

    #[test]
    fn empty_json_uses_defaults() {
        let config = GalleryConfig::from_json_str("{}").expect("config");
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.dimensions, Dimensions::new(1024.0, 576.0));
        assert_eq!(config.race_dimensions(), Dimensions::new(720.0, 576.0));
        assert_eq!(config.gender_dimensions(), Dimensions::new(1024.0, 768.0));
    }

    #[test]
    fn reduced_motion_zeroes_the_cycle() {
        let config = GalleryConfig::default();
        let env = StaticEnvironment::default();
        assert_eq!(config.animation_cycle(&env), 40.0);
        env.set_reduced_motion(true);
        assert_eq!(config.animation_cycle(&env), 0.0);
    }

    #[test]
    fn rejects_negative_padding() {
        let err = GalleryConfig::from_json_str(r#"{"padding": -1}"#).expect_err("invalid");
        assert!(matches!(err, ChartError::Config(_)));
    }
}
