use tracing::warn;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Canvas, CornerRadii, DrawCommand, Font, LineCap, LineJoin, Paint, RenderFrame, TextBaseline,
    TextHAlign, TextMetrics,
};

#[derive(Debug, Clone, PartialEq)]
struct PaintState {
    fill: Paint,
    stroke: Paint,
    line_width: f64,
    dash: Vec<f64>,
    font: Font,
    align: TextHAlign,
    baseline: TextBaseline,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Paint::default(),
            stroke: Paint::default(),
            line_width: 1.0,
            dash: Vec::new(),
            font: Font::default(),
            align: TextHAlign::default(),
            baseline: TextBaseline::default(),
        }
    }
}

/// Headless canvas that records every call instead of rasterizing.
///
/// Used by tests and headless engine usage. Text is measured with a fixed
/// advance of 0.6em per character, an ascent of 0.8em and a descent of 0.2em,
/// so layout stays deterministic across machines.
#[derive(Debug)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    state: PaintState,
    stack: Vec<PaintState>,
    frame: RenderFrame,
    frames_cleared: usize,
    fail_measurement: bool,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> ChartResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        Ok(Self {
            width,
            height,
            state: PaintState::default(),
            stack: Vec::new(),
            frame: RenderFrame::new(width, height),
            frames_cleared: 0,
            fail_measurement: false,
        })
    }

    /// Commands recorded since the last `clear`.
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn take_frame(&mut self) -> RenderFrame {
        std::mem::replace(&mut self.frame, RenderFrame::new(self.width, self.height))
    }

    /// Number of `save` calls currently without a matching `restore`.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn frames_cleared(&self) -> usize {
        self.frames_cleared
    }

    /// Makes every subsequent `measure_text` call fail.
    pub fn set_measurement_failure(&mut self, fail: bool) {
        self.fail_measurement = fail;
    }

    fn record(&mut self, command: DrawCommand) {
        self.frame.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.record(DrawCommand::Save);
    }

    fn restore(&mut self) {
        let Some(previous) = self.stack.pop() else {
            warn!("restore called without a matching save, ignoring");
            return;
        };
        self.state = previous;
        self.record(DrawCommand::Restore);
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.frame = RenderFrame::new(self.width, self.height);
        self.frames_cleared += 1;
        self.record(DrawCommand::Clear);
        Ok(())
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint.clone();
        self.record(DrawCommand::SetFill(paint));
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.state.stroke = paint.clone();
        self.record(DrawCommand::SetStroke(paint));
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.record(DrawCommand::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.to_vec();
        self.record(DrawCommand::SetLineDash(segments.to_vec()));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(DrawCommand::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.record(DrawCommand::SetLineJoin(join));
    }

    fn set_font(&mut self, font: Font) {
        self.state.font = font;
        self.record(DrawCommand::SetFont(font));
    }

    fn set_text_align(&mut self, align: TextHAlign) {
        self.state.align = align;
        self.record(DrawCommand::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
        self.record(DrawCommand::SetTextBaseline(baseline));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f64) {
        self.record(DrawCommand::Rotate(radians));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::Scale { x, y });
    }

    fn begin_path(&mut self) {
        self.record(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.record(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.record(DrawCommand::ArcTo {
            x1,
            y1,
            x2,
            y2,
            radius,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radii: CornerRadii) {
        self.record(DrawCommand::RoundRect {
            x,
            y,
            width,
            height,
            radii,
        });
    }

    fn close_path(&mut self) {
        self.record(DrawCommand::ClosePath);
    }

    fn fill(&mut self) -> ChartResult<()> {
        let paint = self.state.fill.clone();
        self.record(DrawCommand::Fill { paint });
        Ok(())
    }

    fn stroke(&mut self) -> ChartResult<()> {
        let paint = self.state.stroke.clone();
        let line_width = self.state.line_width;
        let dash = self.state.dash.clone();
        self.record(DrawCommand::Stroke {
            paint,
            line_width,
            dash,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> ChartResult<()> {
        let command = DrawCommand::FillText {
            text: text.to_owned(),
            x,
            y,
            font: self.state.font,
            align: self.state.align,
            baseline: self.state.baseline,
            paint: self.state.fill.clone(),
        };
        self.record(command);
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> ChartResult<TextMetrics> {
        if self.fail_measurement {
            return Err(ChartError::TextMeasurement(format!(
                "recording canvas configured to reject `{text}`"
            )));
        }
        let size = self.state.font.size_px;
        Ok(TextMetrics {
            width: 0.6 * size * text.chars().count() as f64,
            ascent: 0.8 * size,
            descent: 0.2 * size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_restore_is_ignored() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0).expect("canvas");
        canvas.restore();
        assert_eq!(canvas.save_depth(), 0);
        assert!(canvas.frame().is_empty());
    }

    #[test]
    fn restore_brings_back_previous_font() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0).expect("canvas");
        canvas.set_font(Font::sans(10.0));
        canvas.save();
        canvas.set_font(Font::serif(40.0).bold());
        canvas.restore();

        let metrics = canvas.measure_text("abcd").expect("metrics");
        assert!((metrics.width - 24.0).abs() <= 1e-9);
        assert!((metrics.height() - 10.0).abs() <= 1e-9);
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0).expect("canvas");
        canvas.fill_text("old", 0.0, 0.0).expect("text");
        canvas.clear().expect("clear");
        canvas.fill_text("new", 0.0, 0.0).expect("text");

        let texts: Vec<_> = canvas.frame().texts().collect();
        assert_eq!(texts, ["new"]);
        assert_eq!(canvas.frames_cleared(), 1);
    }

    #[test]
    fn rejects_degenerate_size() {
        assert!(RecordingCanvas::new(0.0, 10.0).is_err());
    }
}
