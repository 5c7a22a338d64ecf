//! Average UK gender pay gap by year, drawn as a gradient line.

use tracing::debug;

use crate::api::{ChartBehavior, ChartOptions, DataTable, DrawContext};
use crate::charts::axes::{
    TickCounts, Timing, YTickStyle, axis, axis_labels, x_axis_grid, x_axis_tick_labels,
    y_axis_grid, y_axis_tick_labels,
};
use crate::charts::emphasis::{EmphasisTarget, PointEmphasis, PointPalette};
use crate::charts::line_path::{LinePath, is_revealed, reveal_scale};
use crate::charts::{column_extent, year_label};
use crate::core::format::{gbp, percent, sentence_to_title_case};
use crate::core::math::{ease_out_expo, map, unit_progress};
use crate::core::table::record_num;
use crate::core::{Cartesian, CsvTable, HoverCandidate, Margins, PerceptualColor, PointId, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipRequest, find_hovered_point};
use crate::render::{LineCap, LineJoin, LinearGradient, Paint, scoped};

pub const NAME: &str = "Pay Gap";
pub const TITLE: &str = "Gender Pay Gap: Average Difference Between Male and Female Pay";

const TICKS: TickCounts = TickCounts::new(21, 8);
const MIN_PAY_GAP: f64 = 0.0;
const POINT_RADIUS: f64 = 5.0;

pub struct PayGap {
    padding: f64,
    years: Vec<f64>,
    pay_gaps: Vec<f64>,
    max_pay_gap: f64,
    emphasis: Vec<PointEmphasis>,
}

impl PayGap {
    pub fn new(data: &CsvTable, padding: f64) -> ChartResult<Self> {
        let years = data.column_nums("year")?;
        let pay_gaps = data.column_nums("pay_gap")?;
        if years.len() < 2 {
            return Err(ChartError::InvalidData(format!(
                "pay gap line needs at least two years, got {}",
                years.len()
            )));
        }
        let (_, max_pay_gap) = column_extent(&pay_gaps)?;
        debug!(rows = years.len(), max_pay_gap, "pay gap data loaded");
        Ok(Self {
            padding,
            emphasis: vec![PointEmphasis::default(); years.len()],
            years,
            pay_gaps,
            max_pay_gap,
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        let p = self.padding;
        ChartOptions::new(NAME, TITLE).with_margins(Margins::new(p * 2.0, p, 15.0, p * 2.25))
    }

    fn start_year(&self) -> f64 {
        self.years[0]
    }

    fn end_year(&self) -> f64 {
        self.years[self.years.len() - 1]
    }
}

impl ChartBehavior for PayGap {
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        let layout = ctx.layout;
        let cycle = ctx.animation_cycle;
        let elapsed = ctx.elapsed_time;
        let (start_year, end_year) = (self.start_year(), self.end_year());
        let max_pay_gap = self.max_pay_gap;
        let year_to_x = |year: f64| map(year, start_year, end_year, layout.left, layout.right);
        let gap_to_y = |gap: f64| map(gap, MIN_PAY_GAP, max_pay_gap, layout.bottom, layout.top);

        let steps = (self.years.len() - 1) as f64;
        let line_duration = cycle * 80.0;
        let line_delay = cycle * 0.75 * steps;
        let label_delay = cycle * steps / 2.0;

        axis_labels(ctx, "year", "pay gap (%)", Timing::new(elapsed - label_delay, cycle))?;

        let surface1 = ctx.color(ThemeColor::Surface1);
        let surface0 = ctx.color(ThemeColor::Surface0);
        y_axis_grid(
            ctx,
            TICKS,
            (MIN_PAY_GAP, max_pay_gap),
            gap_to_y,
            Timing::new(elapsed, cycle),
            surface1,
        )?;
        let grid_xs: Vec<f64> = self.years[1..].iter().map(|year| year_to_x(*year)).collect();
        x_axis_grid(ctx, &grid_xs, [surface1, surface0], Timing::new(elapsed - cycle, cycle))?;

        let text = ctx.color(ThemeColor::Text);
        axis(ctx, TICKS, Timing::new(elapsed, cycle), text)?;
        y_axis_tick_labels(
            ctx,
            self.padding,
            TICKS,
            (MIN_PAY_GAP, max_pay_gap),
            gap_to_y,
            Timing::new(elapsed, cycle),
            YTickStyle::default(),
        )?;
        let labels: Vec<(String, f64)> = self
            .years
            .iter()
            .map(|year| (year_label(*year), year_to_x(*year)))
            .collect();
        x_axis_tick_labels(ctx, self.padding, &labels, Timing::new(elapsed, cycle), 30.0)?;

        let vertices: Vec<(f64, Cartesian)> = self
            .years
            .iter()
            .zip(&self.pay_gaps)
            .map(|(year, gap)| (*year, Cartesian::new(year_to_x(*year), gap_to_y(*gap))))
            .collect();
        let path = LinePath::new(&vertices);
        let progress = ease_out_expo(unit_progress(elapsed - line_delay, line_duration));
        let target_length = progress * path.total_length();

        let mauve = ctx.color(ThemeColor::Mauve);
        let pink = ctx.color(ThemeColor::Pink);
        let stops = vertices.len();
        let gradient_colors: Vec<PerceptualColor> = (0..stops)
            .map(|i| mauve.interpolate_linear_hue(pink, i as f64 / stops as f64))
            .collect();
        let mut gradient = LinearGradient::new(layout.left, 0.0, layout.right, 0.0);
        for (i, color) in gradient_colors.iter().enumerate() {
            gradient.add_stop(i as f64 / stops as f64, color.with_alpha(0.8));
        }
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_stroke(Paint::LinearGradient(gradient));
            canvas.set_line_width(3.0);
            canvas.set_line_join(LineJoin::Round);
            canvas.set_line_cap(LineCap::Round);
            canvas.begin_path();
            path.trace(canvas, target_length, |_| true, |vertex| vertex);
            canvas.stroke()
        })?;

        let points = path.timed_points(line_duration, line_delay);
        let candidates: Vec<HoverCandidate> = points
            .iter()
            .map(|point| HoverCandidate::new(point.id, point.position.x, point.position.y))
            .collect();
        let hovered = find_hovered_point(
            &candidates,
            ctx.mouse_pos(),
            Some(Cartesian::splat(f64::INFINITY)),
        )?
        .copied();
        let mouse_in_plot = ctx.is_mouse_in_plot(15.0);
        let factor = ctx.emphasis_factor(0.004);

        let mut drawn_points: Vec<PointId> = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            let reveal = reveal_scale(&points, i, elapsed);
            let palette = PointPalette::from_line_color(ctx, gradient_colors[i], false);
            let is_hovered = hovered.is_some_and(|hovered| hovered.id == point.id);
            let target = EmphasisTarget::resolve(mouse_in_plot, is_hovered);
            let emphasis = self.emphasis[i].step(target, factor);
            palette.draw_point(ctx, point.position, POINT_RADIUS * reveal, target, emphasis)?;
            if is_revealed(&points, i, elapsed) {
                drawn_points.push(point.id);
            }
        }

        let Some(hovered) = hovered else {
            return Ok(None);
        };
        let year = map(hovered.x, layout.left, layout.right, start_year, end_year);
        let pay_gap = map(hovered.y, layout.bottom, layout.top, MIN_PAY_GAP, max_pay_gap);
        Ok(Some(
            TooltipRequest::new(year_label(year), gradient_colors[hovered.id.raw()])
                .with_hovered_point(hovered)
                .with_drawn_points(drawn_points)
                .with_row("Pay gap", percent(pay_gap / 100.0, 0, 1))
                .with_mouse_in_plot(mouse_in_plot)
                .with_margin(POINT_RADIUS)
                .with_animation_duration(cycle * 1.2),
        ))
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        let (start, end) = (year_label(self.start_year()), year_label(self.end_year()));
        let headers = data
            .headers()
            .iter()
            .map(|header| sentence_to_title_case(&header.replacen('_', " ", 1)));
        let mut table = DataTable::new(
            format!("Show average gender pay gap from {start} to {end}"),
            format!("Average gender pay gap in the UK ({start}–{end})"),
        )
        .with_headers(headers)
        .with_row_headers();

        for row in data.rows(&["year", "median_male", "median_female", "pay_gap"])? {
            let cell = |column: &str| record_num(&row, column);
            table.push_row(vec![
                year_label(cell("year")?),
                gbp(cell("median_male")?, 0, 2),
                gbp(cell("median_female")?, 0, 2),
                percent(cell("pay_gap")? / 100.0, 0, 1),
            ])?;
        }
        Ok(table)
    }
}
