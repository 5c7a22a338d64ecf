use serde::{Deserialize, Serialize};

use crate::api::{ChartElements, DataTable, Environment};
use crate::core::math::ease_out_cubic;
use crate::core::{AnimationClock, Cartesian, CsvTable, Dimensions, Layout, PerceptualColor, Theme, ThemeColor};
use crate::error::ChartResult;
use crate::interaction::{PlotOffset, PointerTracker, TooltipRequest};
use crate::render::Canvas;

/// Host input forwarded to the active chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// The chart's select element picked option `index`.
    SelectionChanged { index: usize },
    /// The chart's range slider moved.
    RangeChanged { start: f64, end: f64 },
    /// The canvas is now displayed at `display_scale` times its backing size.
    Resized { display_scale: f64 },
}

/// State handed to the one-off lifecycle hooks and to event handling.
pub struct HookContext<'a> {
    pub data: &'a CsvTable,
    pub layout: Layout,
    pub dimensions: Dimensions,
    pub env: &'a dyn Environment,
    pub theme: &'a Theme,
    pub elements: &'a mut ChartElements,
    pub clock: &'a mut AnimationClock,
}

impl HookContext<'_> {
    #[must_use]
    pub fn color(&self, color: ThemeColor) -> PerceptualColor {
        self.theme.color(self.env, color)
    }
}

/// Per-frame state handed to [`ChartBehavior::draw`].
pub struct DrawContext<'a> {
    pub canvas: &'a mut dyn Canvas,
    /// Milliseconds since the previous frame.
    pub dt: f64,
    /// Milliseconds since the chart was set up or its clock was last reset.
    pub elapsed_time: f64,
    /// Animation step in milliseconds; zero under reduced motion.
    pub animation_cycle: f64,
    pub layout: Layout,
    pub dimensions: Dimensions,
    pub pointer: &'a PointerTracker,
    pub data: &'a CsvTable,
    pub elements: &'a mut ChartElements,
    pub env: &'a dyn Environment,
    pub theme: &'a Theme,
}

impl DrawContext<'_> {
    #[must_use]
    pub fn mouse_pos(&self) -> Cartesian {
        self.pointer.position()
    }

    #[must_use]
    pub fn is_mouse_in_plot(&self, offset: impl Into<PlotOffset>) -> bool {
        self.pointer.is_mouse_in_plot(offset)
    }

    #[must_use]
    pub fn color(&self, color: ThemeColor) -> PerceptualColor {
        self.theme.color(self.env, color)
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.env.is_dark()
    }

    /// Interpolation factor for hover emphasis this frame.
    ///
    /// Under reduced motion the factor is the raw frame delta, which snaps
    /// every emphasis to its target on the first non-empty frame.
    #[must_use]
    pub fn emphasis_factor(&self, rate: f64) -> f64 {
        if self.env.prefers_reduced_motion() {
            self.dt
        } else {
            ease_out_cubic(rate * self.dt)
        }
    }
}

/// Chart-specific behavior plugged into the engine.
///
/// `draw` and `build_table` are required; the lifecycle hooks and event
/// handling default to doing nothing.
pub trait ChartBehavior {
    /// Draws one frame and returns what the tooltip should show, if anything.
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>>;

    /// Builds the accessible table from the same rows the chart draws.
    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable>;

    /// One-off setup before the chart is first shown.
    fn preload(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        Ok(())
    }

    /// Runs every time the chart becomes active.
    fn setup(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        Ok(())
    }

    /// Runs every time the chart stops being active.
    fn destroy(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        Ok(())
    }

    /// Reacts to host input after the engine has updated the chart's elements.
    fn on_event(&mut self, _event: ChartEvent, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        Ok(())
    }
}
