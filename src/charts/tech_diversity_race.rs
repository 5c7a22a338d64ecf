//! Racial representation at one selectable company, drawn as a pie.

use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use tracing::debug;

use crate::api::{
    ChartBehavior, ChartEvent, ChartOptions, DataTable, DrawContext, HookContext, HostElement,
    SelectControl,
};
use crate::charts::emphasis::Fade;
use crate::core::format::{percent, sentence_to_title_case};
use crate::core::math::{dist, ease_out_expo, ease_out_quart, lerp, unit_progress};
use crate::core::table::record_num;
use crate::core::{Cartesian, ChartTitle, CsvTable, HoverCandidate, PointId, Polar, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PlotOffset, TooltipRequest};
use crate::render::{CornerRadii, Font, LineCap, LineJoin, Paint, TextBaseline, TextHAlign, scoped};

pub const NAME: &str = "Tech Diversity: Race";

/// Row labels in the order the table lists them.
const RACES: [&str; 6] = ["white", "asian", "latino", "black", "multi", "other"];
const SLICE_COLORS: [ThemeColor; 6] = [
    ThemeColor::Blue,
    ThemeColor::Red,
    ThemeColor::Green,
    ThemeColor::Pink,
    ThemeColor::Mauve,
    ThemeColor::Yellow,
];
const LEGEND_SIZE: f64 = 30.0;
const START_ANGLE: f64 = -FRAC_PI_2;

/// Angular extent of one non-empty share, keyed by its data row.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slice {
    id: PointId,
    start: f64,
    end: f64,
}

impl Slice {
    fn mid_angle(self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Whether `angle` (as returned by `atan2`) falls inside the slice.
    fn contains(self, angle: f64) -> bool {
        let offset = (angle - START_ANGLE).rem_euclid(TAU);
        self.start - START_ANGLE <= offset && offset <= self.end - START_ANGLE
    }
}

/// Lays shares out clockwise from twelve o'clock, skipping zero shares.
fn slice_angles(shares: &[f64]) -> ChartResult<Vec<Slice>> {
    let total: f64 = shares.iter().filter(|share| **share > 0.0).sum();
    if total <= 0.0 {
        return Err(ChartError::InvalidData(
            "race shares must contain a positive value".to_owned(),
        ));
    }
    let mut start = START_ANGLE;
    Ok(shares
        .iter()
        .enumerate()
        .filter(|(_, share)| **share > 0.0)
        .map(|(id, share)| {
            let theta = share / total * TAU;
            let slice = Slice {
                id: PointId::new(id),
                start,
                end: start + theta,
            };
            start += theta;
            slice
        })
        .collect())
}

/// Angle a slice grows from when it has no counterpart in `previous`: the
/// end of the nearest preceding row, wrapping round to the last one.
fn anchor_angle(previous: &[Slice], id: PointId) -> f64 {
    previous
        .iter()
        .rev()
        .find(|slice| slice.id < id)
        .or_else(|| previous.last())
        .map_or(START_ANGLE, |slice| slice.end)
}

pub struct TechDiversityRace {
    company: Rc<RefCell<String>>,
    companies: Vec<String>,
    labels: Vec<String>,
    angles: Option<Vec<Slice>>,
    previous: Option<Vec<Slice>>,
    fades: Vec<Fade>,
}

impl TechDiversityRace {
    pub fn new(data: &CsvTable) -> ChartResult<Self> {
        let companies: Vec<String> = data
            .headers()
            .iter()
            .skip(1)
            .map(|header| header.trim().to_owned())
            .collect();
        let first = companies.first().cloned().ok_or(ChartError::EmptyTable)?;
        let labels: Vec<String> = data
            .column(0)?
            .into_iter()
            .map(str::to_owned)
            .collect();
        if labels.len() > SLICE_COLORS.len() {
            return Err(ChartError::InvalidData(format!(
                "at most {} race rows can be coloured, got {}",
                SLICE_COLORS.len(),
                labels.len()
            )));
        }
        debug!(companies = companies.len(), races = labels.len(), "race representation data loaded");
        Ok(Self {
            company: Rc::new(RefCell::new(first)),
            companies,
            labels,
            angles: None,
            previous: None,
            fades: Vec::new(),
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        let company = Rc::clone(&self.company);
        ChartOptions::new(
            NAME,
            ChartTitle::dynamic(move || format!("Racial Representation at {}", company.borrow())),
        )
    }

    fn idle_alpha(dark: bool) -> f64 {
        if dark { 0.9 } else { 0.8 }
    }

    /// Recomputes the slices for whichever company the select shows.
    fn select_company(&mut self, ctx: &HookContext<'_>) -> ChartResult<Vec<Slice>> {
        let index = ctx.elements.select().map_or(0, SelectControl::selected_index);
        let company = self
            .companies
            .get(index)
            .ok_or_else(|| ChartError::MissingColumn(index.to_string()))?;
        *self.company.borrow_mut() = company.clone();
        let angles = slice_angles(&ctx.data.column_nums(index + 1)?)?;
        self.fades = vec![Fade::new(Self::idle_alpha(ctx.env.is_dark())); angles.len()];
        Ok(angles)
    }

    /// CSV column of the selected company.
    fn selected_column(&self, ctx: &DrawContext<'_>) -> ChartResult<usize> {
        let index = ctx.elements.select().map_or(0, SelectControl::selected_index);
        if index < self.companies.len() {
            Ok(index + 1)
        } else {
            Err(ChartError::MissingColumn(index.to_string()))
        }
    }
}

impl ChartBehavior for TechDiversityRace {
    fn preload(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        ctx.elements
            .push(HostElement::Select(SelectControl::new(self.companies.clone())?));
        Ok(())
    }

    fn setup(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.angles = Some(self.select_company(ctx)?);
        Ok(())
    }

    fn destroy(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.angles = None;
        self.previous = None;
        Ok(())
    }

    fn on_event(&mut self, event: ChartEvent, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        if let ChartEvent::SelectionChanged { index } = event {
            let angles = self.select_company(ctx)?;
            self.previous = self.angles.replace(angles);
            ctx.clock.reset();
            debug!(index, company = %self.company.borrow(), "race company changed");
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        let Some(angles) = self.angles.as_ref() else {
            return Err(ChartError::InvalidData("race chart drawn before setup".to_owned()));
        };
        let layout = ctx.layout;
        let dimensions = ctx.dimensions;
        let elapsed = ctx.elapsed_time;
        let duration = ctx.animation_cycle * 30.0;
        let eased_global = ease_out_quart(unit_progress(elapsed, duration));
        let eased_change = ease_out_expo(unit_progress(elapsed, duration * 0.8));

        let radius = dimensions.width.min(dimensions.height) * 0.465;
        let center = Cartesian::new(
            layout.left + layout.plot_width() / 2.0,
            (dimensions.height + layout.top) / 2.0,
        );
        let mouse = ctx.mouse_pos();
        let hovered = if dist(center, mouse) <= radius {
            let angle = (mouse.y - center.y).atan2(mouse.x - center.x);
            angles.iter().copied().find(|slice| slice.contains(angle))
        } else {
            None
        };

        let dark = ctx.is_dark();
        let factor = ctx.emphasis_factor(0.003);
        let crust = ctx.color(ThemeColor::Crust);
        let text = ctx.color(ThemeColor::Text);

        for (i, slice) in angles.iter().enumerate() {
            let base = ctx.color(SLICE_COLORS[slice.id.raw()]);
            let target = match hovered {
                Some(hovered) if hovered.id == slice.id => 1.0,
                Some(_) => 0.45,
                None => Self::idle_alpha(dark),
            };
            let color = base.with_alpha(self.fades[i].step(target, factor));

            let (from, to) = match self.previous.as_deref() {
                Some(previous) => {
                    let (prev_start, prev_end) = previous
                        .iter()
                        .find(|prev| prev.id == slice.id)
                        .map_or_else(
                            || {
                                let anchor = anchor_angle(previous, slice.id);
                                (anchor, anchor)
                            },
                            |prev| (prev.start, prev.end),
                        );
                    (
                        lerp(prev_start, slice.start, eased_change),
                        lerp(prev_end, slice.end, eased_change),
                    )
                }
                None => (
                    lerp(START_ANGLE, slice.start, eased_global),
                    lerp(START_ANGLE, slice.end, eased_global),
                ),
            };

            let legend_x = center.x + radius + 10.0;
            let legend_y = center.y + LEGEND_SIZE * i as f64 - radius / 2.0;
            let label = &self.labels[slice.id.raw()];
            scoped(&mut *ctx.canvas, |canvas| {
                canvas.set_fill(Paint::Solid(color));
                canvas.begin_path();
                canvas.move_to(center.x, center.y);
                canvas.arc(center.x, center.y, radius, from, to, false);
                canvas.fill()?;

                canvas.set_stroke(Paint::Solid(crust));
                canvas.set_line_cap(LineCap::Round);
                canvas.set_line_join(LineJoin::Round);
                canvas.set_line_width(2.0);
                canvas.begin_path();
                canvas.move_to(center.x, center.y);
                canvas.arc(center.x, center.y, radius, from, to, false);
                canvas.stroke()?;

                let box_height = LEGEND_SIZE * 0.6;
                canvas.set_line_width(1.0);
                canvas.set_stroke(Paint::Solid(text));
                canvas.begin_path();
                canvas.round_rect(legend_x, legend_y, LEGEND_SIZE, box_height, CornerRadii::uniform(2.0));
                canvas.fill()?;
                canvas.stroke()?;

                canvas.set_fill(Paint::Solid(text));
                canvas.set_text_align(TextHAlign::Left);
                canvas.set_text_baseline(TextBaseline::Middle);
                canvas.set_font(Font::sans(16.0));
                canvas.fill_text(label, legend_x + LEGEND_SIZE + 8.0, legend_y + box_height / 2.0)
            })?;
        }

        let Some(hovered) = hovered else {
            return Ok(None);
        };
        let shares = ctx.data.column_nums(self.selected_column(ctx)?)?;
        let share = shares
            .get(hovered.id.raw())
            .copied()
            .ok_or(ChartError::RowOutOfBounds {
                index: hovered.id.raw() as isize,
                len: shares.len(),
            })?;
        let point = HoverCandidate::from_point(
            hovered.id,
            Polar::new(radius / 2.0, hovered.mid_angle()),
            center,
        );
        Ok(Some(
            TooltipRequest::new(sentence_to_title_case(&self.labels[hovered.id.raw()]), text)
                .with_hovered_point(point)
                .with_row("Share", percent(share / 100.0, 0, 1))
                .with_mouse_in_plot(ctx.is_mouse_in_plot(PlotOffset::NONE))
                .with_margin(0.0)
                .with_animation_duration(ctx.animation_cycle * 1.75)
                .with_offset(0.5),
        ))
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        let headers = std::iter::once("company".to_owned())
            .chain(self.labels.iter().cloned())
            .map(|header| sentence_to_title_case(&header));
        let mut table = DataTable::new(
            "Show racial representation by company in 2018",
            "Racial representation at tech companies (2018)",
        )
        .with_headers(headers)
        .with_row_headers();

        for (company, record) in self.companies.iter().zip(data.rows_transposed(&RACES)?) {
            let mut row = vec![company.clone()];
            for race in RACES {
                row.push(percent(record_num(&record, race)? / 100.0, 0, 1));
            }
            table.push_row(row)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const CSV: &str = "race,Acme, Globex\n\
                       white,50,40\n\
                       asian,25,30\n\
                       latino,0,10\n\
                       black,15,10\n\
                       multi,5,5\n\
                       other,5,5\n";

    #[test]
    fn zero_shares_get_no_slice_but_keep_their_id() {
        let slices = slice_angles(&[50.0, 0.0, 50.0]).expect("slices");
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].id, PointId::new(2));
        assert_abs_diff_eq!(slices[0].start, -FRAC_PI_2);
        assert_abs_diff_eq!(slices[0].end, FRAC_PI_2);
        assert_abs_diff_eq!(slices[1].end, 3.0 * FRAC_PI_2);
        assert!(slice_angles(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn containment_wraps_past_twelve_o_clock() {
        let slices = slice_angles(&[25.0, 75.0]).expect("slices");
        // Right of centre is inside the first quarter.
        assert!(slices[0].contains(0.0));
        // Straight up belongs to the slice that starts there.
        assert!(slices[0].contains(-FRAC_PI_2));
        assert!(slices[1].contains(std::f64::consts::PI));
        assert!(slices[1].contains(-FRAC_PI_2 - 0.01));
    }

    #[test]
    fn new_slices_grow_from_the_preceding_row() {
        let previous = slice_angles(&[50.0, 0.0, 50.0]).expect("slices");
        assert_abs_diff_eq!(anchor_angle(&previous, PointId::new(1)), FRAC_PI_2);
        assert_abs_diff_eq!(anchor_angle(&previous[1..], PointId::new(0)), 3.0 * FRAC_PI_2);
    }

    #[test]
    fn table_lists_companies_with_trimmed_names() {
        let data = CsvTable::parse(CSV).expect("csv");
        let chart = TechDiversityRace::new(&data).expect("chart");
        assert_eq!(chart.options().title.resolve(), "Racial Representation at Acme");

        let table = chart.build_table(&data).expect("table");
        assert_eq!(table.headers[0], "Company");
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows[1][0], "Globex");
        assert_eq!(table.column("Latino").expect("latino"), vec!["0%", "10%"]);
    }
}
