use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, Font};

/// Default title font size in pixels.
pub const DEFAULT_TITLE_FONT_SIZE: f64 = 24.0;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1024.0, 576.0)
    }
}

/// Insets of the plot area from the canvas edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    #[must_use]
    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (side, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Pixel bounds of the plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Layout {
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Horizontal centre of the plot area.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.plot_width() / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.plot_height() / 2.0
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }
}

/// Chart title, either fixed or produced afresh on every use.
#[derive(Clone)]
pub enum ChartTitle {
    Static(String),
    Dynamic(Rc<dyn Fn() -> String>),
}

impl ChartTitle {
    pub fn dynamic(producer: impl Fn() -> String + 'static) -> Self {
        ChartTitle::Dynamic(Rc::new(producer))
    }

    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            ChartTitle::Static(title) => title.clone(),
            ChartTitle::Dynamic(producer) => producer(),
        }
    }
}

impl fmt::Debug for ChartTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartTitle::Static(title) => f.debug_tuple("Static").field(title).finish(),
            ChartTitle::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for ChartTitle {
    fn from(value: &str) -> Self {
        ChartTitle::Static(value.to_owned())
    }
}

impl From<String> for ChartTitle {
    fn from(value: String) -> Self {
        ChartTitle::Static(value)
    }
}

/// Font used for chart titles.
#[must_use]
pub fn title_font(size_px: f64) -> Font {
    Font::serif(size_px).bold()
}

/// Computes the plot area, reserving `1.1 x` the measured title height above it.
///
/// The title is resolved on every call. The canvas font is restored before
/// returning, also when measurement fails.
pub fn compute_layout(
    canvas: &mut dyn Canvas,
    dimensions: Dimensions,
    margins: Margins,
    title: &ChartTitle,
    title_font_size: f64,
) -> ChartResult<Layout> {
    if !dimensions.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: dimensions.width,
            height: dimensions.height,
        });
    }
    margins.validate()?;

    canvas.save();
    canvas.set_font(title_font(title_font_size));
    let measured = canvas.measure_text(&title.resolve());
    canvas.restore();
    let metrics = measured?;

    let title_height = metrics.height() * 1.1;
    let layout = Layout::new(
        margins.left,
        dimensions.width - margins.right,
        margins.top + title_height,
        dimensions.height - margins.bottom,
    );
    trace!(?layout, title_height, "computed chart layout");

    if !layout.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: layout.plot_width(),
            height: layout.plot_height(),
        });
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::render::RecordingCanvas;

    #[test]
    fn reserves_scaled_title_height() {
        let mut canvas = RecordingCanvas::new(1024.0, 576.0).expect("canvas");
        let layout = compute_layout(
            &mut canvas,
            Dimensions::new(1024.0, 576.0),
            Margins::new(70.0, 35.0, 15.0, 78.75),
            &ChartTitle::from("Pay gap"),
            24.0,
        )
        .expect("layout");

        // 24px title: ascent + descent = 24, times 1.1.
        assert!((layout.top - (15.0 + 26.4)).abs() <= 1e-9);
        assert_eq!(layout.left, 70.0);
        assert_eq!(layout.right, 989.0);
        assert_eq!(layout.bottom, 576.0 - 78.75);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn dynamic_title_is_resolved_each_call() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let title = ChartTitle::dynamic(move || {
            counter.set(counter.get() + 1);
            "Changing".to_owned()
        });
        let mut canvas = RecordingCanvas::new(100.0, 100.0).expect("canvas");
        for _ in 0..2 {
            compute_layout(&mut canvas, Dimensions::new(100.0, 100.0), Margins::default(), &title, 10.0)
                .expect("layout");
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn measurement_failure_propagates_and_restores_state() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0).expect("canvas");
        canvas.set_measurement_failure(true);
        let result = compute_layout(
            &mut canvas,
            Dimensions::new(100.0, 100.0),
            Margins::default(),
            &ChartTitle::from("x"),
            10.0,
        );
        assert!(matches!(result, Err(ChartError::TextMeasurement(_))));
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn margins_swallowing_the_canvas_are_rejected() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0).expect("canvas");
        let result = compute_layout(
            &mut canvas,
            Dimensions::new(100.0, 100.0),
            Margins::new(60.0, 50.0, 0.0, 0.0),
            &ChartTitle::from("x"),
            10.0,
        );
        assert!(matches!(result, Err(ChartError::InvalidViewport { .. })));
    }
}
