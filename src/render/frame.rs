use crate::core::PerceptualColor;
use crate::error::{ChartError, ChartResult};
use crate::render::{CornerRadii, Font, LineCap, LineJoin, Paint, TextBaseline, TextHAlign};

/// One canvas call captured by [`crate::render::RecordingCanvas`].
///
/// Drawing commands (`Fill`, `Stroke`, `FillText`) carry the paint state that
/// was current when they were issued, so a frame can be inspected without
/// replaying the state stack.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Clear,
    SetFill(Paint),
    SetStroke(Paint),
    SetLineWidth(f64),
    SetLineDash(Vec<f64>),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetFont(Font),
    SetTextAlign(TextHAlign),
    SetTextBaseline(TextBaseline),
    Translate {
        x: f64,
        y: f64,
    },
    Rotate(f64),
    Scale {
        x: f64,
        y: f64,
    },
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    ArcTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    RoundRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: CornerRadii,
    },
    ClosePath,
    Fill {
        paint: Paint,
    },
    Stroke {
        paint: Paint,
        line_width: f64,
        dash: Vec<f64>,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: Font,
        align: TextHAlign,
        baseline: TextBaseline,
        paint: Paint,
    },
}

/// Commands recorded between two `clear` calls, i.e. one drawn frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Radii of every arc appended to a path, in draw order.
    pub fn arc_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Arc { radius, .. } => Some(*radius),
            _ => None,
        })
    }

    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Fill { .. }))
            .count()
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke { .. }))
            .count()
    }

    /// Position of the first `FillText` whose text equals `text`.
    #[must_use]
    pub fn position_of_text(&self, text: &str) -> Option<usize> {
        self.commands.iter().position(|command| {
            matches!(command, DrawCommand::FillText { text: drawn, .. } if drawn == text)
        })
    }

    /// Solid fill colors used by `FillText` commands with the given text.
    pub fn text_colors<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PerceptualColor> + 'a {
        self.commands.iter().filter_map(move |command| match command {
            DrawCommand::FillText {
                text: drawn, paint, ..
            } if drawn == text => paint.solid_color(),
            _ => None,
        })
    }

    /// Checks that every `Save` is matched by a `Restore` and that no draw
    /// command carries non-finite geometry.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }

        let mut depth: usize = 0;
        for command in &self.commands {
            match command {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        ChartError::InvalidData("restore without matching save".to_owned())
                    })?;
                }
                DrawCommand::MoveTo { x, y } | DrawCommand::LineTo { x, y } => {
                    if !x.is_finite() || !y.is_finite() {
                        return Err(ChartError::InvalidData(
                            "path coordinates must be finite".to_owned(),
                        ));
                    }
                }
                DrawCommand::Arc { x, y, radius, .. } => {
                    if !x.is_finite() || !y.is_finite() || !radius.is_finite() || *radius < 0.0 {
                        return Err(ChartError::InvalidData(
                            "arc must have a finite centre and a non-negative radius".to_owned(),
                        ));
                    }
                }
                DrawCommand::FillText { x, y, .. } => {
                    if !x.is_finite() || !y.is_finite() {
                        return Err(ChartError::InvalidData(
                            "text coordinates must be finite".to_owned(),
                        ));
                    }
                }
                _ => {}
            }
        }

        if depth != 0 {
            return Err(ChartError::InvalidData(format!(
                "{depth} save call(s) left without a matching restore"
            )));
        }
        Ok(())
    }
}
