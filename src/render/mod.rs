mod frame;
mod primitives;
mod recording_canvas;

pub use frame::{DrawCommand, RenderFrame};
pub use primitives::{
    Color, CornerRadii, Font, FontFamily, FontWeight, GradientStop, LineCap, LineJoin,
    LinearGradient, Paint, TextBaseline, TextHAlign, TextMetrics,
};
pub use recording_canvas::RecordingCanvas;

use crate::error::ChartResult;

/// Immediate-mode 2D drawing surface implemented by every backend.
///
/// Paint state (fill, stroke, line style, font, text alignment and the current
/// transform) lives on a save/restore stack. Any code that mutates paint state
/// is expected to wrap the mutation in `save`/`restore` before returning.
///
/// The trait is object-safe so chart behaviors can draw through `&mut dyn Canvas`
/// without knowing which backend is active.
pub trait Canvas {
    /// Width of the backing pixel buffer.
    fn width(&self) -> f64;
    /// Height of the backing pixel buffer.
    fn height(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);

    /// Clears the whole surface to transparent.
    fn clear(&mut self) -> ChartResult<()>;

    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f64);
    /// Sets the dash pattern; an empty slice draws solid lines.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_font(&mut self, font: Font);
    fn set_text_align(&mut self, align: TextHAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn translate(&mut self, x: f64, y: f64);
    /// Rotates subsequent drawing clockwise by `radians`.
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Appends a circular arc; angles in radians, measured clockwise from +x.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    /// Appends an arc tangent to the lines (current, p1) and (p1, p2).
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Appends a rounded rectangle; `width` may be negative to grow leftwards.
    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radii: CornerRadii);
    fn close_path(&mut self);

    fn fill(&mut self) -> ChartResult<()>;
    fn stroke(&mut self) -> ChartResult<()>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> ChartResult<()>;
    /// Measures `text` in the current font.
    fn measure_text(&mut self, text: &str) -> ChartResult<TextMetrics>;

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> ChartResult<()> {
        self.begin_path();
        self.rect(x, y, width, height);
        self.fill()
    }

    /// Strokes a single straight segment.
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> ChartResult<()> {
        self.begin_path();
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.stroke()
    }
}

/// Runs `draw` between `save` and `restore`; the state is restored also when
/// `draw` fails.
pub fn scoped<F>(canvas: &mut dyn Canvas, draw: F) -> ChartResult<()>
where
    F: FnOnce(&mut dyn Canvas) -> ChartResult<()>,
{
    canvas.save();
    let result = draw(&mut *canvas);
    canvas.restore();
    result
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::CairoCanvas;
