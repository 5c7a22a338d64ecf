//! Global average surface temperature by year with a year-range slider.

use tracing::{debug, trace};

use crate::api::{ChartBehavior, ChartOptions, DataTable, DrawContext, HookContext, HostElement, RangeSlider};
use crate::charts::axes::{
    TickCounts, Timing, YTickStyle, axis, axis_labels, x_axis_tick_labels, y_axis_tick_labels,
};
use crate::charts::emphasis::{EmphasisTarget, PointEmphasis, PointPalette};
use crate::charts::line_path::{LinePath, LineSegment, is_revealed, reveal_scale};
use crate::charts::{column_extent, year_label};
use crate::core::format::{celsius, sentence_to_title_case};
use crate::core::math::{clamp_unit, ease_out_cubic, ease_out_expo, lerp, lerp_hue, map, map_from, map_to, unit_progress};
use crate::core::table::record_num;
use crate::core::{Cartesian, CsvTable, HoverCandidate, Margins, PerceptualColor, PointId, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipMargin, TooltipRequest, find_hovered_point};
use crate::render::{Font, LineCap, LineJoin, LinearGradient, Paint, TextBaseline, TextHAlign, scoped};

pub const NAME: &str = "Climate Change";
pub const TITLE: &str = "Climate Change: Average Surface Temperature";

const TICKS: TickCounts = TickCounts::new(21, 8);
const SLIDER_MARGIN: f64 = 5.0;
const GRADIENT_STOPS: usize = 25;
const COLD_HUE: f64 = 256.0;
const WARM_HUE: f64 = 32.0;

pub struct ClimateChange {
    padding: f64,
    years: Vec<f64>,
    temperatures: Vec<f64>,
    min_temperature: f64,
    max_temperature: f64,
    emphasis: Vec<PointEmphasis>,
    /// Tick years of the first frame; they pace the intro animation.
    label_years: Option<Vec<f64>>,
}

impl ClimateChange {
    pub fn new(data: &CsvTable, padding: f64) -> ChartResult<Self> {
        let years = data.column_nums("year")?;
        let temperatures = data.column_nums("temperature")?;
        let (min_year, max_year) = column_extent(&years)?;
        if max_year - min_year < SLIDER_MARGIN {
            return Err(ChartError::InvalidData(format!(
                "temperature data must span at least {SLIDER_MARGIN} years, got {min_year}..{max_year}"
            )));
        }
        let (min_temperature, max_temperature) = column_extent(&temperatures)?;
        debug!(rows = years.len(), min_temperature, max_temperature, "temperature data loaded");
        Ok(Self {
            padding,
            emphasis: vec![PointEmphasis::default(); years.len()],
            years,
            temperatures,
            min_temperature,
            max_temperature,
            label_years: None,
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        let p = self.padding;
        ChartOptions::new(NAME, TITLE).with_margins(Margins::new(p * 2.0, p / 2.0, 15.0, p * 2.25))
    }

    fn min_year(&self) -> f64 {
        self.years[0]
    }

    fn max_year(&self) -> f64 {
        self.years[self.years.len() - 1]
    }

    /// Line colour for `temperature`: blue when cold, orange when warm.
    #[must_use]
    pub fn temperature_color(&self, temperature: f64, dark: bool) -> PerceptualColor {
        let t = map_to(temperature, self.min_temperature, self.max_temperature);
        let (l_min, l_max) = if dark { (0.7, 0.8) } else { (0.5, 0.6) };
        let (c_min, c_max) = if dark { (0.13, 0.16) } else { (0.18, 0.22) };
        PerceptualColor::new(
            lerp(l_min, l_max, t),
            lerp(c_min, c_max, t),
            lerp_hue(COLD_HUE, WARM_HUE, t),
        )
    }

    /// Point radius grows as the selected range narrows.
    fn point_radius(&self, start: f64, end: f64) -> f64 {
        map_to(end - start, self.max_year() - self.min_year(), 0.0) * 2.0 + 4.5
    }

    fn index_of(&self, year: f64) -> usize {
        ((year - self.min_year()).max(0.0) as usize).min(self.years.len() - 1)
    }

    fn update_slider_gradient(&self, ctx: &mut DrawContext<'_>, (start, end): (f64, f64), progress: f64) {
        let dark = ctx.is_dark();
        let background = ctx.color(ThemeColor::Surface1);
        let from = self.index_of(start) + 1;
        let to = self.index_of(end).max(from);
        let count = (to - from) as f64;
        let colors = self.temperatures[from..to]
            .iter()
            .enumerate()
            .map(|(i, temperature)| {
                if (i + 1) as f64 / count <= progress {
                    self.temperature_color(*temperature, dark).with_alpha(0.8)
                } else {
                    background
                }
            })
            .collect();
        if let Some(slider) = ctx.elements.slider_mut() {
            slider.set_connect_colors(colors);
        }
    }
}

impl ChartBehavior for ClimateChange {
    fn preload(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        let slider = RangeSlider::new(self.min_year(), self.max_year())?
            .with_step(1.0)?
            .with_margin(SLIDER_MARGIN)?;
        ctx.elements.push(HostElement::RangeSlider(slider));
        Ok(())
    }

    fn setup(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        if let Some(slider) = ctx.elements.slider_mut() {
            slider.reset();
        }
        self.label_years = None;
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        let [start, end] = ctx
            .elements
            .slider()
            .map(RangeSlider::get)
            .ok_or_else(|| ChartError::InvalidData("climate chart has no year slider".to_owned()))?;
        let layout = ctx.layout;
        let cycle = ctx.animation_cycle;
        let elapsed = ctx.elapsed_time;
        let dark = ctx.is_dark();
        let (min_temperature, max_temperature) = (self.min_temperature, self.max_temperature);
        let year_to_x = |year: f64| map(year, start, end, layout.left, layout.right);
        let temperature_to_y =
            |t: f64| map(t, min_temperature, max_temperature, layout.bottom, layout.top);

        let label_stride = ((end - start) / TICKS.x as f64).ceil().max(1.0) as usize;
        let current_years: Vec<f64> = self
            .years
            .iter()
            .enumerate()
            .filter(|(i, year)| **year >= start && **year < end && i % label_stride == 0)
            .map(|(_, year)| *year)
            .collect();
        let label_count = self
            .label_years
            .get_or_insert_with(|| current_years.clone())
            .len()
            .saturating_sub(1) as f64;

        let line_duration = cycle * 100.0;
        let line_delay = cycle * 0.75 * label_count;
        let label_time = elapsed - cycle * label_count / 2.0;

        axis_labels(ctx, "year", "temperature (°C)", Timing::new(label_time, cycle * 5.0))?;
        let text = ctx.color(ThemeColor::Text);
        axis(ctx, TICKS, Timing::new(elapsed, cycle), text)?;
        y_axis_tick_labels(
            ctx,
            self.padding,
            TICKS,
            (min_temperature, max_temperature),
            temperature_to_y,
            Timing::new(elapsed, cycle),
            YTickStyle {
                decimals: 1,
                inverse: false,
            },
        )?;
        let labels: Vec<(String, f64)> = current_years
            .iter()
            .map(|year| (year_label(*year), year_to_x(*year)))
            .collect();
        x_axis_tick_labels(ctx, self.padding, &labels, Timing::new(elapsed, cycle), 30.0)?;

        let vertices: Vec<(f64, Cartesian)> = self
            .years
            .iter()
            .zip(&self.temperatures)
            .map(|(year, t)| (*year, Cartesian::new(year_to_x(*year), temperature_to_y(*t))))
            .collect();
        let path = LinePath::new(&vertices);
        let progress = ease_out_expo(unit_progress(elapsed - line_delay, line_duration));
        let target_length = progress * path.total_length();
        let in_range = |segment: &LineSegment| {
            segment.key >= start && segment.key < end
        };

        if !ctx.env.forced_colors() {
            self.update_slider_gradient(ctx, (start, end), progress);
        }

        let selected = &self.temperatures[self.index_of(start)..=self.index_of(end)];
        let mean = selected.iter().sum::<f64>() / selected.len() as f64;
        let mean_y = temperature_to_y(mean);
        let range_norm = (end - start) / (self.max_year() - self.min_year());
        let mean_label_color = ctx
            .color(ThemeColor::Subtext1)
            .with_alpha(ease_out_cubic(clamp_unit((label_time - 200.0) / 500.0)));
        let mean_line_color = self
            .temperature_color(mean, dark)
            .with_alpha(if dark { 0.5 } else { 0.6 });
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_font(Font::sans(16.0));
            canvas.set_text_baseline(TextBaseline::Bottom);
            canvas.set_text_align(TextHAlign::Left);
            canvas.set_fill(Paint::Solid(mean_label_color));
            canvas.fill_text(
                &format!("Mean: {}", celsius(mean, 0, 2)),
                layout.left + 5.0,
                mean_y - 5.0,
            )?;

            canvas.set_line_dash(&[10.0 / range_norm, 14.0 / range_norm]);
            canvas.set_line_width(2.0);
            canvas.set_stroke(Paint::Solid(mean_line_color));
            canvas.begin_path();
            path.trace(canvas, target_length, in_range, |vertex| Cartesian::new(vertex.x, mean_y));
            canvas.stroke()
        })?;

        let mut gradient = LinearGradient::new(0.0, layout.bottom, 0.0, layout.top);
        for i in 0..GRADIENT_STOPS {
            let stop = i as f64 / GRADIENT_STOPS as f64;
            let temperature = map_from(stop, min_temperature, max_temperature);
            gradient.add_stop(stop, self.temperature_color(temperature, dark).with_alpha(0.8));
        }
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_stroke(Paint::LinearGradient(gradient));
            canvas.set_line_width(3.0);
            canvas.set_line_join(LineJoin::Round);
            canvas.set_line_cap(LineCap::Round);
            canvas.begin_path();
            path.trace(canvas, target_length, in_range, |vertex| vertex);
            canvas.stroke()
        })?;

        let points = path.timed_points(line_duration, line_delay);
        let visible = |key: f64| key >= start && key <= end;
        let candidates: Vec<HoverCandidate> = points
            .iter()
            .filter(|point| visible(point.key))
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
        let radius = self.point_radius(start, end);

        let mut drawn_points: Vec<PointId> = Vec::new();
        for (i, point) in points.iter().enumerate() {
            if !visible(point.key) {
                continue;
            }
            let reveal = reveal_scale(&points, i, elapsed);
            let line_color = self.temperature_color(self.temperatures[i], dark);
            let palette = PointPalette::from_line_color(ctx, line_color, true);
            let is_hovered = hovered.is_some_and(|hovered| hovered.id == point.id);
            let target = EmphasisTarget::resolve(mouse_in_plot, is_hovered);
            let emphasis = self.emphasis[i].step(target, factor);
            palette.draw_point(ctx, point.position, radius * reveal, target, emphasis)?;
            if is_revealed(&points, i, elapsed) {
                drawn_points.push(point.id);
            }
        }
        trace!(start, end, drawn = drawn_points.len(), "temperature points drawn");

        let Some(hovered) = hovered else {
            return Ok(None);
        };
        let year = map(hovered.x, layout.left, layout.right, start, end);
        let temperature = map(hovered.y, layout.bottom, layout.top, min_temperature, max_temperature);
        let stroke = self
            .temperature_color(temperature, dark)
            .with_alpha(if dark { 0.8 } else { 0.9 });
        Ok(Some(
            TooltipRequest::new(year_label(year), stroke)
                .with_hovered_point(hovered)
                .with_drawn_points(drawn_points)
                .with_row("Temperature", celsius(temperature, 0, 2))
                .with_mouse_in_plot(mouse_in_plot)
                .with_margin(TooltipMargin::Axes {
                    x: radius * 1.5,
                    y: 0.0,
                })
                .with_animation_duration(cycle * 1.2),
        ))
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        let mut table = DataTable::new(
            "Show average surface temperature data from 1880 to 2018",
            "Global average surface temperature by year (1880–2018)",
        )
        .with_headers(data.headers().iter().map(|header| sentence_to_title_case(header)))
        .with_row_headers();

        for row in data.rows(&["year", "temperature"])? {
            table.push_row(vec![
                year_label(record_num(&row, "year")?),
                celsius(record_num(&row, "temperature")?, 0, 2),
            ])?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn chart() -> ClimateChange {
        let mut csv = String::from("year,temperature\n");
        for (i, year) in (2000..=2010).enumerate() {
            csv.push_str(&format!("{year},{}\n", 13.0 + i as f64 * 0.1));
        }
        let data = CsvTable::parse(&csv).expect("csv");
        ClimateChange::new(&data, 50.0).expect("chart")
    }

    #[test]
    fn colder_years_are_bluer() {
        let chart = chart();
        let cold = chart.temperature_color(13.0, false);
        let warm = chart.temperature_color(14.0, false);
        assert_abs_diff_eq!(cold.hue(), COLD_HUE, epsilon = 1e-9);
        assert_abs_diff_eq!(warm.hue(), WARM_HUE, epsilon = 1e-9);
        assert!(warm.lightness() > cold.lightness());
    }

    #[test]
    fn points_grow_as_the_range_narrows() {
        let chart = chart();
        assert_abs_diff_eq!(chart.point_radius(2000.0, 2010.0), 4.5);
        assert_abs_diff_eq!(chart.point_radius(2000.0, 2005.0), 5.5);
    }

    #[test]
    fn table_uses_title_case_headers() {
        let chart = chart();
        let data = CsvTable::parse("year,temperature\n1880,13.25\n").expect("csv");
        let table = chart.build_table(&data).expect("table");
        assert_eq!(table.headers, vec!["Year", "Temperature"]);
        assert_eq!(table.rows[0], vec!["1880", "13.25°C"]);
    }

    #[test]
    fn short_series_cannot_carry_a_slider() {
        let data = CsvTable::parse("year,temperature\n2000,1\n2002,2\n").expect("csv");
        assert!(ClimateChange::new(&data, 50.0).is_err());
    }
}
