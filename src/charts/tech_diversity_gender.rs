//! Share of female and male employees per company as mirrored bars.

use tracing::debug;

use crate::api::{ChartBehavior, ChartOptions, DataTable, DrawContext};
use crate::charts::emphasis::Fade;
use crate::core::format::{percent, sentence_to_title_case};
use crate::core::math::{ease_out_cubic, ease_out_elastic_with, ease_out_sine, map, unit_progress};
use crate::core::table::record_num;
use crate::core::{Cartesian, CsvTable, HoverCandidate, Margins, PerceptualColor, PointId, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PlotOffset, TooltipMargin, TooltipRequest, find_hovered_point};
use crate::render::{Canvas, CornerRadii, Font, Paint, TextBaseline, TextHAlign, scoped};

pub const NAME: &str = "Tech Diversity: Gender";
pub const TITLE: &str = "Gender Representation at Tech Companies";

/// Horizontal inset of the bars inside the plot.
const BAR_MARGIN: f64 = 10.0;
const ROW_SPACING: f64 = 8.0;
const LABEL_PADDING: f64 = 5.0;
/// Widest overshoot of the elastic entry, in pixels.
const MAX_OVERSHOOT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
struct CompanyRow {
    name: String,
    female: f64,
    male: f64,
}

/// Eased opacity targets for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AlphaTargets {
    bar: f64,
    text: f64,
}

impl AlphaTargets {
    fn resolve(hovered: Option<PointId>, id: PointId, dark: bool) -> Self {
        match hovered {
            Some(hovered) if hovered == id => Self { bar: 1.0, text: 1.0 },
            Some(_) => Self {
                bar: if dark { 0.4 } else { 0.3 },
                text: if dark { 0.5 } else { 0.4 },
            },
            None => Self {
                bar: if dark { 0.6 } else { 0.5 },
                text: if dark { 0.95 } else { 0.9 },
            },
        }
    }
}

pub struct TechDiversityGender {
    padding: f64,
    rows: Vec<CompanyRow>,
    bar_fades: Vec<Fade>,
    text_fades: Vec<Fade>,
}

impl TechDiversityGender {
    pub fn new(data: &CsvTable, padding: f64) -> ChartResult<Self> {
        let rows = data
            .rows(&["company", "male", "female"])?
            .into_iter()
            .map(|row| {
                Ok(CompanyRow {
                    name: row.get("company").cloned().unwrap_or_default(),
                    female: record_num(&row, "female")?,
                    male: record_num(&row, "male")?,
                })
            })
            .collect::<ChartResult<Vec<CompanyRow>>>()?;
        if rows.is_empty() {
            return Err(ChartError::EmptyTable);
        }
        debug!(companies = rows.len(), "gender representation data loaded");
        Ok(Self {
            padding,
            bar_fades: vec![Fade::new(0.4); rows.len()],
            text_fades: vec![Fade::new(0.8); rows.len()],
            rows,
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        let p = self.padding;
        // One pixel at the bottom keeps the 2px outline of the last bar visible.
        ChartOptions::new(NAME, TITLE).with_margins(Margins::new(p * 3.25, p * 1.5, 10.0, 1.0))
    }

    fn draw_category_labels(ctx: &mut DrawContext<'_>) -> ChartResult<()> {
        let layout = ctx.layout;
        let coefficient = if ctx.is_dark() { 1.1 } else { 0.8 };
        let female = ctx.color(ThemeColor::Lavender).scale_lightness(coefficient);
        let male = ctx.color(ThemeColor::Flamingo).scale_lightness(coefficient);
        let y = layout.top - 5.0;
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_font(Font::sans(16.0).bold());
            canvas.set_text_baseline(TextBaseline::Bottom);
            canvas.set_fill(Paint::Solid(female));
            canvas.set_text_align(TextHAlign::Left);
            canvas.fill_text("Female", layout.left + 12.0, y)?;
            canvas.set_fill(Paint::Solid(male));
            canvas.set_text_align(TextHAlign::Right);
            canvas.fill_text("Male", layout.right - 12.0, y)
        })
    }
}

/// Entry progress of a bar `width` pixels long; the elastic overshoot is
/// capped at [`MAX_OVERSHOOT`] pixels whatever the bar length.
fn bar_progress(eased: f64, width: f64) -> f64 {
    if eased > 1.0 && width > 0.0 {
        1.0 + (eased - 1.0) * (MAX_OVERSHOOT / width)
    } else {
        eased
    }
}

/// Outlines a bar from its open end `open_x` to its rounded end `edge_x`,
/// squeezed horizontally towards `open_x` by `progress`.
fn bar_outline(
    canvas: &mut dyn Canvas,
    (open_x, edge_x): (f64, f64),
    y: f64,
    height: f64,
    radius: f64,
    progress: f64,
) -> ChartResult<()> {
    let inward = if open_x >= edge_x { 1.0 } else { -1.0 };
    scoped(canvas, |canvas| {
        canvas.translate(open_x, 0.0);
        canvas.scale(progress, 1.0);
        canvas.translate(-open_x, 0.0);

        canvas.begin_path();
        canvas.move_to(open_x, y);
        canvas.line_to(edge_x + radius * inward, y);
        canvas.arc_to(edge_x, y, edge_x, y + radius, radius);
        canvas.line_to(edge_x, y + height - radius);
        canvas.arc_to(edge_x, y + height, edge_x + radius * inward, y + height, radius);
        canvas.line_to(open_x, y + height);
        canvas.stroke()
    })
}

impl ChartBehavior for TechDiversityGender {
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        Self::draw_category_labels(ctx)?;

        let layout = ctx.layout;
        let elapsed = ctx.elapsed_time;
        let bar_duration = ctx.animation_cycle * 25.0;
        let n = self.rows.len();
        let line_height = (layout.plot_height() - ROW_SPACING * (n as f64 - 1.0)) / n as f64;
        let rect_width = layout.plot_width() - BAR_MARGIN * 2.0;
        let percent_to_width = |value: f64| map(value, 0.0, 100.0, 0.0, rect_width);
        let x_left = layout.left + BAR_MARGIN;
        let x_right = layout.right - BAR_MARGIN;
        let row_y = |i: usize| layout.top + i as f64 * (line_height + ROW_SPACING);

        let candidates: Vec<HoverCandidate> = (0..n)
            .map(|i| {
                HoverCandidate::new(
                    PointId::new(i),
                    x_left + rect_width / 2.0,
                    row_y(i) + line_height / 2.0,
                )
            })
            .collect();
        let hovered = find_hovered_point(
            &candidates,
            ctx.mouse_pos(),
            Some(Cartesian::new(rect_width / 2.0, (line_height + ROW_SPACING) / 2.0)),
        )?
        .map(|candidate| candidate.id);
        let mouse_in_plot = ctx.is_mouse_in_plot(PlotOffset::Directional {
            left: BAR_MARGIN,
            right: -BAR_MARGIN,
            top: -5.0,
            bottom: 5.0,
        });

        let dark = ctx.is_dark();
        let factor = ctx.emphasis_factor(0.003);
        let female_color = ctx.color(ThemeColor::Lavender);
        let male_color = ctx.color(ThemeColor::Flamingo);
        let label_color = ctx.color(ThemeColor::Subtext1);
        let radius = line_height / 2.25;
        let radii = CornerRadii::right(radius);

        let mut drawn_points: Vec<PointId> = Vec::with_capacity(n);
        for (i, row) in self.rows.iter().enumerate() {
            let id = PointId::new(i);
            let y = row_y(i);
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let fill_delay = bar_duration * 2.0 * (1.0 - ease_out_sine(1.0 - t));
            let eased = ease_out_elastic_with(unit_progress(elapsed - fill_delay, bar_duration), 0.4, 8.0);
            if elapsed > fill_delay {
                drawn_points.push(id);
            }

            let targets = AlphaTargets::resolve(hovered, id, dark);
            let bar_alpha = self.bar_fades[i].step(targets.bar, factor);
            let text_alpha = self.text_fades[i].step(targets.text, factor);

            let female_width = percent_to_width(row.female);
            let male_width = percent_to_width(row.male);
            let female_progress = bar_progress(eased, female_width);
            let male_progress = bar_progress(eased, male_width);

            let tag_delay = fill_delay + bar_duration / 7.5;
            let tag_alpha = text_alpha * ease_out_cubic(unit_progress(elapsed - tag_delay, bar_duration));
            let female = female_color.with_alpha(bar_alpha);
            let male = male_color.with_alpha(bar_alpha);

            scoped(&mut *ctx.canvas, |canvas| {
                canvas.set_fill(Paint::Solid(female));
                canvas.begin_path();
                canvas.round_rect(
                    x_left + female_width,
                    y,
                    -female_progress * female_width,
                    line_height,
                    radii,
                );
                canvas.fill()?;

                canvas.set_fill(Paint::Solid(male));
                canvas.begin_path();
                canvas.round_rect(x_right - male_width, y, male_progress * male_width, line_height, radii);
                canvas.fill()?;

                canvas.set_line_width(2.0);
                canvas.set_stroke(Paint::Solid(female));
                bar_outline(canvas, (x_left + female_width, x_left), y, line_height, radius, female_progress)?;
                canvas.set_stroke(Paint::Solid(male));
                bar_outline(canvas, (x_right - male_width, x_right), y, line_height, radius, male_progress)?;

                canvas.set_font(Font::sans(17.0));
                canvas.set_text_align(TextHAlign::Right);
                canvas.set_text_baseline(TextBaseline::Middle);
                canvas.set_fill(Paint::Solid(label_color.with_alpha(tag_alpha)));
                canvas.fill_text(&row.name, x_left - LABEL_PADDING, y + 10.0)
            })?;
        }

        let Some(hovered) = hovered else {
            return Ok(None);
        };
        let row = &self.rows[hovered.raw()];
        let male_share = row.male / 100.0;
        let stroke: PerceptualColor = female_color.interpolate(male_color, male_share);
        Ok(Some(
            TooltipRequest::new(row.name.clone(), stroke)
                .with_hovered_point(HoverCandidate::new(
                    hovered,
                    x_left + rect_width / 2.0,
                    row_y(hovered.raw()),
                ))
                .with_drawn_points(drawn_points)
                .with_row("Female", percent(row.female / 100.0, 0, 1))
                .with_row("Male", percent(male_share, 0, 1))
                .with_mouse_in_plot(mouse_in_plot)
                .with_margin(TooltipMargin::Axes {
                    x: -50.0,
                    y: line_height + 2.0,
                })
                .with_animation_duration(ctx.animation_cycle * 1.2),
        ))
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        let mut table = DataTable::new(
            "Show share of female and male employees by company in 2018",
            "Gender representation at tech companies (2018)",
        )
        .with_headers(data.headers().iter().map(|header| sentence_to_title_case(header)))
        .with_row_headers();

        for row in data.rows(&["company", "female", "male"])? {
            table.push_row(vec![
                row.get("company").cloned().unwrap_or_default(),
                percent(record_num(&row, "female")? / 100.0, 0, 1),
                percent(record_num(&row, "male")? / 100.0, 0, 1),
            ])?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn overshoot_is_capped_in_pixels() {
        assert_abs_diff_eq!(bar_progress(0.5, 400.0), 0.5);
        assert_abs_diff_eq!(bar_progress(1.1, 400.0), 1.025);
        assert_abs_diff_eq!(bar_progress(1.1, 0.0), 1.1);
    }

    #[test]
    fn hover_dims_the_other_rows() {
        let hovered = Some(PointId::new(1));
        assert_eq!(
            AlphaTargets::resolve(hovered, PointId::new(1), false),
            AlphaTargets { bar: 1.0, text: 1.0 }
        );
        assert_eq!(
            AlphaTargets::resolve(hovered, PointId::new(0), true),
            AlphaTargets { bar: 0.4, text: 0.5 }
        );
        assert_eq!(
            AlphaTargets::resolve(None, PointId::new(0), false),
            AlphaTargets { bar: 0.5, text: 0.9 }
        );
    }

    #[test]
    fn table_keeps_csv_column_order() {
        let data = CsvTable::parse("company,female,male\nAcme,31,69\n").expect("csv");
        let chart = TechDiversityGender::new(&data, 50.0).expect("chart");
        let table = chart.build_table(&data).expect("table");
        assert_eq!(table.headers, vec!["Company", "Female", "Male"]);
        assert_eq!(table.rows[0], vec!["Acme", "31%", "69%"]);
    }
}
