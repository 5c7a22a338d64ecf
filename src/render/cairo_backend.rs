use std::f64::consts::{FRAC_PI_2, PI};
use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface, Operator};
use pango::FontDescription;
use tracing::{trace, warn};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Canvas, Color, CornerRadii, Font, FontFamily, FontWeight, LineCap, LineJoin, Paint,
    TextBaseline, TextHAlign, TextMetrics,
};

#[derive(Debug, Clone)]
struct PaintState {
    fill: Paint,
    stroke: Paint,
    font: Font,
    align: TextHAlign,
    baseline: TextBaseline,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Paint::default(),
            stroke: Paint::default(),
            font: Font::default(),
            align: TextHAlign::default(),
            baseline: TextBaseline::default(),
        }
    }
}

/// Cairo + Pango + PangoCairo canvas drawing into an ARGB32 image surface.
///
/// Cairo keeps a single source, so fill and stroke paints are tracked here and
/// applied right before each `fill`/`stroke`. Transform, line width and dash
/// live on Cairo's own save/restore stack. Paths survive `fill` and `stroke`
/// until the next `begin_path`, as on an HTML canvas.
pub struct CairoCanvas {
    surface: ImageSurface,
    context: Context,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl std::fmt::Debug for CairoCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CairoCanvas")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("save_depth", &self.stack.len())
            .finish()
    }
}

impl CairoCanvas {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: f64::from(width),
                height: f64::from(height),
            });
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            surface,
            context,
            state: PaintState::default(),
            stack: Vec::new(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Flushes pending drawing and writes the surface as PNG.
    pub fn write_png(&self, path: &Path) -> ChartResult<()> {
        self.surface.flush();
        let mut file = File::create(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| ChartError::Backend(format!("failed to encode png: {err}")))?;
        trace!(path = %path.display(), "wrote png snapshot");
        Ok(())
    }

    fn apply_paint(&self, paint: &Paint) -> ChartResult<()> {
        match paint {
            Paint::Solid(color) => {
                let rgba = Color::from(*color);
                self.context
                    .set_source_rgba(rgba.red, rgba.green, rgba.blue, rgba.alpha);
            }
            Paint::LinearGradient(gradient) => {
                let pattern =
                    cairo::LinearGradient::new(gradient.x0, gradient.y0, gradient.x1, gradient.y1);
                for stop in &gradient.stops {
                    let rgba = Color::from(stop.color);
                    pattern.add_color_stop_rgba(
                        stop.offset,
                        rgba.red,
                        rgba.green,
                        rgba.blue,
                        rgba.alpha,
                    );
                }
                self.context
                    .set_source(&pattern)
                    .map_err(|err| map_backend_error("failed to set gradient source", err))?;
            }
        }
        Ok(())
    }

    fn text_layout(&self, text: &str) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(self.state.font)));
        layout.set_text(text);
        layout
    }
}

fn font_description(font: Font) -> FontDescription {
    let mut description = FontDescription::new();
    description.set_family(match font.family {
        FontFamily::Serif => "Serif",
        FontFamily::SansSerif => "Sans",
    });
    description.set_weight(match font.weight {
        FontWeight::Normal => pango::Weight::Normal,
        FontWeight::Bold => pango::Weight::Bold,
    });
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    description
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}

impl Canvas for CairoCanvas {
    fn width(&self) -> f64 {
        f64::from(self.surface.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.surface.height())
    }

    fn save(&mut self) {
        if let Err(err) = self.context.save() {
            warn!(error = %err, "cairo save failed");
        }
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        let Some(previous) = self.stack.pop() else {
            warn!("restore called without a matching save, ignoring");
            return;
        };
        self.state = previous;
        if let Err(err) = self.context.restore() {
            warn!(error = %err, "cairo restore failed");
        }
    }

    fn clear(&mut self) -> ChartResult<()> {
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save before clear", err))?;
        self.context.identity_matrix();
        self.context.set_operator(Operator::Clear);
        let painted = self.context.paint();
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore after clear", err))?;
        painted.map_err(|err| map_backend_error("failed to clear surface", err))
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.state.stroke = paint;
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.context.set_dash(segments, 0.0);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.context.set_line_cap(match cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.context.set_line_join(match join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        });
    }

    fn set_font(&mut self, font: Font) {
        self.state.font = font;
    }

    fn set_text_align(&mut self, align: TextHAlign) {
        self.state.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.context.translate(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        self.context.rotate(radians);
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.context.scale(x, y);
    }

    fn begin_path(&mut self) {
        self.context.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        if anticlockwise {
            self.context.arc_negative(x, y, radius, start, end);
        } else {
            self.context.arc(x, y, radius, start, end);
        }
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        let Ok((x0, y0)) = self.context.current_point() else {
            self.context.move_to(x1, y1);
            return;
        };

        let (ax, ay) = (x0 - x1, y0 - y1);
        let (bx, by) = (x2 - x1, y2 - y1);
        let (len_a, len_b) = (ax.hypot(ay), bx.hypot(by));
        let cross = ax * by - ay * bx;
        if radius <= 0.0 || len_a == 0.0 || len_b == 0.0 || cross.abs() < f64::EPSILON {
            self.context.line_to(x1, y1);
            return;
        }

        let (ux, uy) = (ax / len_a, ay / len_a);
        let (vx, vy) = (bx / len_b, by / len_b);
        let half_angle = (ux * vx + uy * vy).clamp(-1.0, 1.0).acos() / 2.0;
        let tangent = radius / half_angle.tan();
        let (t1x, t1y) = (x1 + ux * tangent, y1 + uy * tangent);
        let (t2x, t2y) = (x1 + vx * tangent, y1 + vy * tangent);

        let (bisector_x, bisector_y) = (ux + vx, uy + vy);
        let bisector_len = bisector_x.hypot(bisector_y);
        let center_distance = radius / half_angle.sin();
        let cx = x1 + bisector_x / bisector_len * center_distance;
        let cy = y1 + bisector_y / bisector_len * center_distance;

        let start = (t1y - cy).atan2(t1x - cx);
        let end = (t2y - cy).atan2(t2x - cx);
        self.context.line_to(t1x, t1y);
        if cross > 0.0 {
            self.context.arc_negative(cx, cy, radius, start, end);
        } else {
            self.context.arc(cx, cy, radius, start, end);
        }
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.rectangle(x, y, width, height);
    }

    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radii: CornerRadii) {
        let (left, width, radii) = if width < 0.0 {
            let mirrored = CornerRadii {
                top_left: radii.top_right,
                top_right: radii.top_left,
                bottom_right: radii.bottom_left,
                bottom_left: radii.bottom_right,
            };
            (x + width, -width, mirrored)
        } else {
            (x, width, radii)
        };
        let radii = radii.fitted(width, height);
        let right = left + width;
        let bottom = y + height;
        let context = &self.context;

        context.new_sub_path();
        context.move_to(left + radii.top_left, y);
        context.line_to(right - radii.top_right, y);
        if radii.top_right > 0.0 {
            context.arc(right - radii.top_right, y + radii.top_right, radii.top_right, -FRAC_PI_2, 0.0);
        }
        context.line_to(right, bottom - radii.bottom_right);
        if radii.bottom_right > 0.0 {
            context.arc(
                right - radii.bottom_right,
                bottom - radii.bottom_right,
                radii.bottom_right,
                0.0,
                FRAC_PI_2,
            );
        }
        context.line_to(left + radii.bottom_left, bottom);
        if radii.bottom_left > 0.0 {
            context.arc(
                left + radii.bottom_left,
                bottom - radii.bottom_left,
                radii.bottom_left,
                FRAC_PI_2,
                PI,
            );
        }
        context.line_to(left, y + radii.top_left);
        if radii.top_left > 0.0 {
            context.arc(left + radii.top_left, y + radii.top_left, radii.top_left, PI, PI + FRAC_PI_2);
        }
        context.close_path();
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn fill(&mut self) -> ChartResult<()> {
        self.apply_paint(&self.state.fill)?;
        self.context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))
    }

    fn stroke(&mut self) -> ChartResult<()> {
        self.apply_paint(&self.state.stroke)?;
        self.context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke path", err))
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> ChartResult<()> {
        let layout = self.text_layout(text);
        let (_ink, logical) = layout.pixel_extents();
        let width = f64::from(logical.width());
        let height = f64::from(logical.height());
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

        let dx = match self.state.align {
            TextHAlign::Left => 0.0,
            TextHAlign::Center => width / 2.0,
            TextHAlign::Right => width,
        };
        let dy = match self.state.baseline {
            TextBaseline::Top => 0.0,
            TextBaseline::Middle => height / 2.0,
            TextBaseline::Alphabetic => baseline,
            TextBaseline::Bottom => height,
        };

        self.apply_paint(&self.state.fill)?;
        // Text must not extend the caller's path.
        let path = self
            .context
            .copy_path()
            .map_err(|err| map_backend_error("failed to copy path", err))?;
        self.context.new_path();
        self.context.move_to(x - dx, y - dy);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.context.new_path();
        self.context.append_path(&path);
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> ChartResult<TextMetrics> {
        let layout = self.text_layout(text);
        let (ink, logical) = layout.pixel_extents();
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        let ink_top = f64::from(ink.y());
        let ink_bottom = f64::from(ink.y() + ink.height());
        let metrics = TextMetrics {
            width: f64::from(logical.width()),
            ascent: (baseline - ink_top).max(0.0),
            descent: (ink_bottom - baseline).max(0.0),
        };
        if !metrics.width.is_finite() || !metrics.ascent.is_finite() {
            return Err(ChartError::TextMeasurement(format!(
                "pango returned invalid extents for `{text}`"
            )));
        }
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PerceptualColor;

    #[test]
    fn draws_and_measures_text() {
        let mut canvas = CairoCanvas::new(120, 60).expect("canvas");
        canvas.set_font(Font::serif(24.0).bold());
        let metrics = canvas.measure_text("Title").expect("metrics");
        assert!(metrics.width > 0.0);
        assert!(metrics.height() > 0.0);

        canvas.set_fill(Paint::Solid(PerceptualColor::new(0.5, 0.1, 200.0)));
        canvas.begin_path();
        canvas.round_rect(110.0, 10.0, -50.0, 20.0, CornerRadii::right(5.0));
        canvas.fill().expect("fill");
        canvas.fill_text("Title", 60.0, 30.0).expect("text");
        canvas.clear().expect("clear");
    }
}
