use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::api::Environment;
use crate::core::math::{ease_out_quad, lerp, unit_progress};
use crate::core::{AnimationClock, Cartesian, HoverCandidate, Layout, PerceptualColor, PointId, Theme, ThemeColor};
use crate::error::ChartResult;
use crate::render::{Canvas, CornerRadii, Font, TextBaseline, TextHAlign};

const PADDING: f64 = 10.0;
const HEADER_HEIGHT: f64 = 30.0;
const ROW_HEIGHT: f64 = 20.0;
const CORNER_RADIUS: f64 = 5.0;
const BACKGROUND_ALPHA: f64 = 0.85;
const TITLE_FONT_SIZE: f64 = 16.0;
const ROW_FONT_SIZE: f64 = 14.0;

/// Gap between the hovered point and the tooltip box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TooltipMargin {
    Uniform(f64),
    Axes { x: f64, y: f64 },
}

impl TooltipMargin {
    #[must_use]
    pub fn resolve(self) -> Cartesian {
        match self {
            TooltipMargin::Uniform(margin) => Cartesian::splat(margin),
            TooltipMargin::Axes { x, y } => Cartesian::new(x, y),
        }
    }
}

impl Default for TooltipMargin {
    fn default() -> Self {
        TooltipMargin::Uniform(0.0)
    }
}

impl From<f64> for TooltipMargin {
    fn from(value: f64) -> Self {
        TooltipMargin::Uniform(value)
    }
}

/// What a chart wants shown in the tooltip this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRequest {
    pub hovered_point: Option<HoverCandidate>,
    /// Ids of the marks already visible; `None` means every mark is.
    pub drawn_points: Option<Vec<PointId>>,
    pub title: String,
    pub data: IndexMap<String, String>,
    pub mouse_in_plot: bool,
    pub margin: TooltipMargin,
    /// Transition time between targets, in milliseconds.
    pub animation_duration: f64,
    pub stroke: PerceptualColor,
    /// Shifts the box back by this fraction of its size, to centre it on radial marks.
    pub offset: Option<f64>,
}

impl TooltipRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, stroke: PerceptualColor) -> Self {
        Self {
            hovered_point: None,
            drawn_points: None,
            title: title.into(),
            data: IndexMap::new(),
            mouse_in_plot: true,
            margin: TooltipMargin::default(),
            animation_duration: 0.0,
            stroke,
            offset: None,
        }
    }

    #[must_use]
    pub fn with_hovered_point(mut self, point: HoverCandidate) -> Self {
        self.hovered_point = Some(point);
        self
    }

    #[must_use]
    pub fn with_drawn_points(mut self, ids: impl IntoIterator<Item = PointId>) -> Self {
        self.drawn_points = Some(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_row(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_mouse_in_plot(mut self, mouse_in_plot: bool) -> Self {
        self.mouse_in_plot = mouse_in_plot;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: impl Into<TooltipMargin>) -> Self {
        self.margin = margin.into();
        self
    }

    #[must_use]
    pub fn with_animation_duration(mut self, duration_ms: f64) -> Self {
        self.animation_duration = duration_ms;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.data.iter().map(|(key, value)| format!("{key}: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipPhase {
    Idle,
    Targeting,
}

/// Public tooltip snapshot exposed to hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub phase: TooltipPhase,
    pub queued: Vec<PointId>,
    pub target: Option<PointId>,
    /// Final position of the last completed transition.
    pub last: Option<Cartesian>,
    /// Clock time at which the current target was acquired.
    pub target_acquired_at: Option<f64>,
    /// Top-left corner of the box drawn in the latest frame.
    pub rendered: Option<Cartesian>,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            phase: TooltipPhase::Idle,
            queued: Vec::new(),
            target: None,
            last: None,
            target_acquired_at: None,
            rendered: None,
        }
    }
}

/// Queued, animated tooltip.
///
/// At most one transition runs at a time. Hover targets wait in a FIFO queue
/// (deduplicated by id) and the head is picked up once the running transition
/// has committed. The very first tooltip after a reset, and every tooltip
/// under reduced motion, is placed without animation.
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    queue: VecDeque<HoverCandidate>,
    target: Option<HoverCandidate>,
    last: Option<Cartesian>,
    start: Option<Cartesian>,
    start_time: f64,
    rendered: Option<Cartesian>,
}

impl TooltipController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the queue, the target and the last position.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.target = None;
        self.last = None;
        self.start = None;
        self.start_time = 0.0;
        self.rendered = None;
    }

    /// Drops pending targets; called once per frame before charts re-enqueue.
    pub fn reset_queue(&mut self) {
        self.queue.clear();
    }

    #[must_use]
    pub fn state(&self) -> TooltipState {
        TooltipState {
            phase: if self.target.is_some() {
                TooltipPhase::Targeting
            } else {
                TooltipPhase::Idle
            },
            queued: self.queue.iter().map(|candidate| candidate.id).collect(),
            target: self.target.map(|candidate| candidate.id),
            last: self.last,
            target_acquired_at: self.target.map(|_| self.start_time),
            rendered: self.rendered,
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<Cartesian> {
        self.last
    }

    /// Queues the hovered point and draws the tooltip for the current target.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        layout: &Layout,
        clock: &AnimationClock,
        env: &dyn Environment,
        theme: &Theme,
        request: &TooltipRequest,
    ) -> ChartResult<()> {
        self.rendered = None;
        if !request.mouse_in_plot {
            self.reset();
            return Ok(());
        }
        let Some(hovered) = request.hovered_point else {
            warn!("tooltip requested without a hovered point");
            return Ok(());
        };
        if let Some(drawn) = &request.drawn_points
            && !drawn.contains(&hovered.id)
        {
            return Ok(());
        }

        if !self.queue.iter().any(|queued| queued.id == hovered.id) {
            self.queue.push_back(hovered);
        }
        if self.target.is_none()
            && let Some(next) = self.queue.pop_front()
        {
            trace!(id = %next.id, "tooltip target acquired");
            self.target = Some(next);
            self.start = self.last;
            self.start_time = clock.elapsed_time();
        }
        let Some(target) = self.target else {
            return Ok(());
        };

        canvas.save();
        let result = self.draw_box(canvas, layout, clock, env, theme, request, target);
        canvas.restore();
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_box(
        &mut self,
        canvas: &mut dyn Canvas,
        layout: &Layout,
        clock: &AnimationClock,
        env: &dyn Environment,
        theme: &Theme,
        request: &TooltipRequest,
        target: HoverCandidate,
    ) -> ChartResult<()> {
        let title_font = Font::sans(TITLE_FONT_SIZE).bold();
        let row_font = Font::sans(ROW_FONT_SIZE);

        canvas.set_font(title_font);
        let title_width = canvas.measure_text(&request.title)?.width;
        canvas.set_font(row_font);
        let mut rows_width: f64 = 0.0;
        for row in request.rows() {
            rows_width = rows_width.max(canvas.measure_text(&row)?.width);
        }

        let width = title_width.max(rows_width) + 2.0 * PADDING;
        let height = HEADER_HEIGHT + request.data.len() as f64 * ROW_HEIGHT + PADDING / 2.0;
        let destination = place(target.position(), width, height, layout, request);

        let position = match self.start {
            Some(start) if !env.prefers_reduced_motion() => {
                let progress = ease_out_quad(unit_progress(
                    clock.elapsed_time() - self.start_time,
                    request.animation_duration,
                ));
                if progress >= 1.0 {
                    self.commit(destination);
                }
                Cartesian::new(
                    lerp(start.x, destination.x, progress),
                    lerp(start.y, destination.y, progress),
                )
            }
            _ => {
                self.commit(destination);
                destination
            }
        };
        self.rendered = Some(position);

        canvas.set_fill(theme.color(env, ThemeColor::Base).with_alpha(BACKGROUND_ALPHA).into());
        canvas.set_stroke(request.stroke.into());
        canvas.set_line_width(1.0);
        canvas.begin_path();
        canvas.round_rect(position.x, position.y, width, height, CornerRadii::uniform(CORNER_RADIUS));
        canvas.fill()?;
        canvas.stroke()?;

        canvas.set_text_baseline(TextBaseline::Middle);
        canvas.set_text_align(TextHAlign::Center);
        canvas.set_font(title_font);
        canvas.set_fill(theme.color(env, ThemeColor::Text).into());
        canvas.fill_text(&request.title, position.x + width / 2.0, position.y + PADDING * 1.5)?;

        canvas.set_text_align(TextHAlign::Left);
        canvas.set_font(row_font);
        canvas.set_fill(theme.color(env, ThemeColor::Subtext0).into());
        for (i, row) in request.rows().enumerate() {
            canvas.fill_text(
                &row,
                position.x + PADDING,
                position.y + 4.0 * PADDING + i as f64 * ROW_HEIGHT,
            )?;
        }
        Ok(())
    }

    fn commit(&mut self, destination: Cartesian) {
        self.last = Some(destination);
        self.target = None;
    }
}

/// Top-left corner of a `width` x `height` box anchored to `anchor`, flipped
/// to the left or upwards when it would leave the plot.
fn place(anchor: Cartesian, width: f64, height: f64, layout: &Layout, request: &TooltipRequest) -> Cartesian {
    let margin = request.margin.resolve();
    let overshoots_right = anchor.x + width + margin.x > layout.right;
    let overshoots_bottom = anchor.y + height + margin.y > layout.bottom;

    let x_offset = if overshoots_right { -width - margin.x } else { margin.x };
    let y_offset = if overshoots_bottom { -height } else { margin.y };
    let centring = request.offset.unwrap_or(0.0);
    Cartesian::new(
        anchor.x + x_offset - centring * width,
        anchor.y + y_offset - centring * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticEnvironment;
    use crate::render::RecordingCanvas;

    fn layout() -> Layout {
        Layout::new(50.0, 500.0, 40.0, 300.0)
    }

    fn request(id: usize, x: f64, y: f64) -> TooltipRequest {
        TooltipRequest::new("2001", PerceptualColor::new(0.6, 0.1, 300.0))
            .with_hovered_point(HoverCandidate::new(PointId::new(id), x, y))
            .with_row("Pay gap", "17.5%")
            .with_margin(5.0)
            .with_animation_duration(100.0)
    }

    #[test]
    fn first_tooltip_is_placed_instantly() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let mut tooltip = TooltipController::new();
        let clock = AnimationClock::new();

        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &Theme::default(), &request(0, 100.0, 100.0))
            .expect("draw");

        let state = tooltip.state();
        assert_eq!(state.phase, TooltipPhase::Idle);
        assert_eq!(state.last, Some(Cartesian::new(105.0, 105.0)));
        assert_eq!(state.rendered, state.last);
        assert_eq!(canvas.save_depth(), 0);
        assert!(canvas.frame().texts().any(|text| text == "Pay gap: 17.5%"));
    }

    #[test]
    fn flips_when_overflowing_the_plot() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let mut tooltip = TooltipController::new();

        tooltip
            .draw(&mut canvas, &layout(), &AnimationClock::new(), &env, &Theme::default(), &request(0, 490.0, 295.0))
            .expect("draw");

        let last = tooltip.last().expect("placed");
        assert!(last.x < 490.0);
        assert!(last.y < 295.0);
    }

    #[test]
    fn later_targets_animate_from_the_last_position() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let theme = Theme::default();
        let mut tooltip = TooltipController::new();
        let mut clock = AnimationClock::new();

        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(0, 100.0, 100.0))
            .expect("first");
        tooltip.reset_queue();
        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(1, 200.0, 100.0))
            .expect("acquire");
        assert_eq!(tooltip.state().phase, TooltipPhase::Targeting);
        assert_eq!(tooltip.state().rendered, Some(Cartesian::new(105.0, 105.0)));

        clock.update(50.0);
        tooltip.reset_queue();
        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(1, 200.0, 100.0))
            .expect("halfway");
        let halfway = tooltip.state().rendered.expect("rendered");
        assert!(halfway.x > 105.0 && halfway.x < 205.0);

        clock.update(50.0);
        tooltip.reset_queue();
        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(1, 200.0, 100.0))
            .expect("done");
        assert_eq!(tooltip.last(), Some(Cartesian::new(205.0, 105.0)));
    }

    #[test]
    fn same_point_is_queued_once_per_frame() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let theme = Theme::default();
        let mut tooltip = TooltipController::new();
        let clock = AnimationClock::new();

        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(0, 100.0, 100.0))
            .expect("first");
        tooltip.reset_queue();
        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(1, 200.0, 100.0))
            .expect("acquire");
        for _ in 0..2 {
            tooltip
                .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(2, 300.0, 100.0))
                .expect("queue");
        }

        let state = tooltip.state();
        assert_eq!(state.target, Some(PointId::new(1)));
        assert_eq!(state.queued, [PointId::new(2)]);

        tooltip.reset_queue();
        assert!(tooltip.state().queued.is_empty());
    }

    #[test]
    fn leaving_the_plot_resets_everything() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let theme = Theme::default();
        let mut tooltip = TooltipController::new();
        let clock = AnimationClock::new();

        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(0, 100.0, 100.0))
            .expect("draw");
        tooltip
            .draw(&mut canvas, &layout(), &clock, &env, &theme, &request(0, 100.0, 100.0).with_mouse_in_plot(false))
            .expect("leave");
        assert_eq!(tooltip.state(), TooltipState::default());
    }

    #[test]
    fn points_not_yet_drawn_are_skipped() {
        let mut canvas = RecordingCanvas::new(600.0, 400.0).expect("canvas");
        let env = StaticEnvironment::default();
        let mut tooltip = TooltipController::new();

        tooltip
            .draw(
                &mut canvas,
                &layout(),
                &AnimationClock::new(),
                &env,
                &Theme::default(),
                &request(3, 100.0, 100.0).with_drawn_points([PointId::new(0), PointId::new(1)]),
            )
            .expect("draw");
        assert_eq!(tooltip.state(), TooltipState::default());
        assert!(canvas.frame().is_empty());
    }
}
