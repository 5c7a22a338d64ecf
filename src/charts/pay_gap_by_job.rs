//! Pay gap against the share of women in each occupation, one bubble per job.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::api::{ChartBehavior, ChartOptions, DataTable, DrawContext, HookContext};
use crate::charts::axes::{
    TickCounts, Timing, YTickStyle, axis, axis_labels, point, x_axis_tick_labels,
    y_axis_tick_labels,
};
use crate::charts::column_extent;
use crate::charts::emphasis::Fade;
use crate::core::format::percent;
use crate::core::math::{ease_in_out_cubic, ease_out_elastic, map, map_from, unit_progress};
use crate::core::table::record_num;
use crate::core::{Cartesian, CsvTable, HoverCandidate, Margins, PerceptualColor, PointId, ThemeColor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{TooltipMargin, TooltipRequest, find_hovered_point};
use crate::render::{Paint, scoped};

pub const NAME: &str = "Pay Gap by Job";
pub const TITLE: &str = "Gender Pay Gap: Average Difference Between Male and Female Pay by Occupation";

const TICKS: TickCounts = TickCounts::new(21, 8);
const PROPORTION_FEMALE_MIN: f64 = 0.0;
const PROPORTION_FEMALE_MAX: f64 = 100.0;
const DOT_SIZE_MIN: f64 = 15.0;
const DOT_SIZE_MAX: f64 = 40.0;
const X_TICKS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];
const INITIAL_ALPHA: f64 = 0.5;

/// Job type colours, indexed by `job_type_code - 1`.
const JOB_TYPE_COLORS: [ThemeColor; 9] = [
    ThemeColor::Flamingo,
    ThemeColor::Pink,
    ThemeColor::Mauve,
    ThemeColor::Red,
    ThemeColor::Peach,
    ThemeColor::Yellow,
    ThemeColor::Green,
    ThemeColor::Sky,
    ThemeColor::Lavender,
];

#[derive(Debug, Clone, PartialEq)]
struct Job {
    type_code: f64,
    subtype: String,
    num_jobs_female: f64,
    num_jobs: f64,
    proportion_female: f64,
    pay_gap: f64,
}

impl Job {
    fn jobs_label(&self) -> String {
        format!("{} ({})", self.num_jobs, self.num_jobs_female)
    }
}

/// Resting position and full size of a job's bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bubble {
    center: Cartesian,
    radius: f64,
}

pub struct PayGapByJob {
    padding: f64,
    shuffle_seed: Option<u64>,
    jobs: Vec<Job>,
    num_jobs_range: (f64, f64),
    pay_gap_min: f64,
    pay_gap_max: f64,
    bubbles: Vec<Bubble>,
    /// Entry order of the bubbles, reshuffled on every setup.
    order: Vec<usize>,
    fades: Vec<Fade>,
}

impl PayGapByJob {
    pub fn new(data: &CsvTable, padding: f64, shuffle_seed: Option<u64>) -> ChartResult<Self> {
        let jobs = data
            .rows(&[
                "job_type_code",
                "job_subtype",
                "num_jobs_female",
                "num_jobs",
                "proportion_female",
                "pay_gap",
            ])?
            .into_iter()
            .map(|row| {
                Ok(Job {
                    type_code: record_num(&row, "job_type_code")?,
                    subtype: row.get("job_subtype").cloned().unwrap_or_default(),
                    num_jobs_female: record_num(&row, "num_jobs_female")?,
                    num_jobs: record_num(&row, "num_jobs")?,
                    proportion_female: record_num(&row, "proportion_female")?,
                    pay_gap: record_num(&row, "pay_gap")?,
                })
            })
            .collect::<ChartResult<Vec<Job>>>()?;

        let num_jobs: Vec<f64> = jobs.iter().map(|job| job.num_jobs).collect();
        let pay_gaps: Vec<f64> = jobs.iter().map(|job| job.pay_gap).collect();
        let num_jobs_range = column_extent(&num_jobs)?;
        let (pay_gap_min, pay_gap_max) = column_extent(&pay_gaps)?;
        let (pay_gap_min, pay_gap_max) = (pay_gap_min.floor(), pay_gap_max.ceil());
        if pay_gap_min == pay_gap_max {
            return Err(ChartError::InvalidData(format!(
                "occupation pay gaps must span a range, all round to {pay_gap_min}"
            )));
        }
        debug!(jobs = jobs.len(), pay_gap_min, pay_gap_max, "occupation data loaded");

        Ok(Self {
            padding,
            shuffle_seed,
            fades: vec![Fade::new(INITIAL_ALPHA); jobs.len()],
            order: (0..jobs.len()).collect(),
            bubbles: Vec::new(),
            jobs,
            num_jobs_range,
            pay_gap_min,
            pay_gap_max,
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        let p = self.padding;
        ChartOptions::new(NAME, TITLE).with_margins(Margins::new(p * 2.0, p, 15.0, p * 2.25))
    }

    /// Picks a new entry order for the bubbles; a seed makes it repeatable.
    fn shuffle_order(&mut self) {
        self.order = (0..self.jobs.len()).collect();
        match self.shuffle_seed {
            Some(seed) => self.order.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => self.order.shuffle(&mut rand::rng()),
        }
        trace!(seeded = self.shuffle_seed.is_some(), "bubble entry order shuffled");
    }

    fn job_color(&self, ctx: &DrawContext<'_>, job: &Job) -> PerceptualColor {
        let index = job.type_code as i64 - 1;
        usize::try_from(index)
            .ok()
            .and_then(|index| JOB_TYPE_COLORS.get(index))
            .map_or_else(|| PerceptualColor::new(0.0, 0.0, 0.0), |color| ctx.color(*color))
    }
}

fn proportion_to_x(value: f64, left: f64, right: f64) -> f64 {
    map(value, PROPORTION_FEMALE_MIN, PROPORTION_FEMALE_MAX, left, right)
}

impl ChartBehavior for PayGapByJob {
    fn preload(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        let layout = ctx.layout;
        let (num_jobs_min, num_jobs_max) = self.num_jobs_range;
        let (gap_max, gap_min) = (self.pay_gap_max, self.pay_gap_min);
        self.bubbles = self
            .jobs
            .iter()
            .map(|job| Bubble {
                center: Cartesian::new(
                    proportion_to_x(job.proportion_female, layout.left, layout.right),
                    map(
                        job.pay_gap,
                        gap_max,
                        gap_min,
                        layout.top + DOT_SIZE_MAX / 2.0,
                        layout.bottom - DOT_SIZE_MAX / 2.0,
                    ),
                ),
                radius: if num_jobs_max > num_jobs_min {
                    map(job.num_jobs, num_jobs_min, num_jobs_max, DOT_SIZE_MIN, DOT_SIZE_MAX)
                } else {
                    DOT_SIZE_MAX
                } * 1.2
                    / 2.0,
            })
            .collect();
        Ok(())
    }

    fn setup(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.shuffle_order();
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        if self.bubbles.len() != self.jobs.len() {
            return Err(ChartError::InvalidData(
                "occupation bubbles drawn before preload".to_owned(),
            ));
        }
        let layout = ctx.layout;
        let cycle = ctx.animation_cycle;
        let elapsed = ctx.elapsed_time;
        let (gap_min, gap_max) = (self.pay_gap_min, self.pay_gap_max);
        let gap_to_y = |gap: f64| {
            map(
                gap,
                gap_max,
                gap_min,
                layout.top + DOT_SIZE_MAX / 2.0,
                layout.bottom - DOT_SIZE_MAX / 2.0,
            )
        };
        let axis_duration = cycle * 5.0;

        axis_labels(
            ctx,
            "proportion female (%)",
            "pay gap (%)",
            Timing::new(elapsed - cycle * 10.0, cycle * 5.0),
        )?;
        let text = ctx.color(ThemeColor::Text);
        axis(ctx, TICKS, Timing::new(elapsed, axis_duration / 5.0), text)?;

        let surface1 = ctx.color(ThemeColor::Surface1);
        let eased = ease_in_out_cubic(unit_progress(elapsed, axis_duration * 4.0));
        let center_x = proportion_to_x(50.0, layout.left, layout.right);
        let center_y = gap_to_y(0.0);
        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_line_width(1.0);
            canvas.set_stroke(Paint::Solid(surface1));
            canvas.line(
                map_from(eased, center_x, layout.left),
                center_y,
                map_from(eased, center_x, layout.right),
                center_y,
            )?;
            canvas.line(
                center_x,
                map_from(eased, center_y, layout.top),
                center_x,
                map_from(eased, center_y, layout.bottom),
            )
        })?;

        y_axis_tick_labels(
            ctx,
            self.padding,
            TICKS,
            (gap_max, gap_min),
            gap_to_y,
            Timing::new(elapsed, axis_duration / 5.0),
            YTickStyle {
                decimals: 0,
                inverse: true,
            },
        )?;
        let labels: Vec<(String, f64)> = X_TICKS
            .iter()
            .map(|tick| (format!("{tick}"), proportion_to_x(*tick, layout.left, layout.right)))
            .collect();
        x_axis_tick_labels(ctx, self.padding, &labels, Timing::new(elapsed, axis_duration * 0.8), 0.0)?;

        let line_time = elapsed - axis_duration * 1.5;
        let count = self.order.len() as f64;
        let entries: Vec<(usize, HoverCandidate, f64)> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                let unit = unit_progress(line_time - i as f64 * cycle, count * cycle);
                let bubble = self.bubbles[index];
                let radius = bubble.radius * ease_out_elastic(unit);
                let candidate =
                    HoverCandidate::new(PointId::new(index), bubble.center.x, bubble.center.y)
                        .with_radius(radius);
                (index, candidate, unit)
            })
            .collect();
        let candidates: Vec<HoverCandidate> = entries.iter().map(|(_, candidate, _)| *candidate).collect();
        let hovered = find_hovered_point(&candidates, ctx.mouse_pos(), None)?.copied();
        let mouse_in_plot = ctx.is_mouse_in_plot(15.0);
        let factor = ctx.emphasis_factor(0.003);
        let not_hovered_alpha = if ctx.is_dark() { 0.4 } else { 0.3 };

        let mut drawn_points: Vec<PointId> = Vec::with_capacity(entries.len());
        let mut marks: Vec<(HoverCandidate, PerceptualColor, f64)> = Vec::with_capacity(entries.len());
        for (index, candidate, unit) in &entries {
            if *unit > 0.0 {
                drawn_points.push(candidate.id);
            }
            if hovered.is_some_and(|hovered| hovered.id == candidate.id) {
                continue;
            }
            let alpha = self.fades[*index].step(not_hovered_alpha, factor);
            marks.push((*candidate, self.job_color(ctx, &self.jobs[*index]), alpha));
        }
        let mut hovered_job = None;
        if let Some(hovered) = hovered {
            let index = hovered.id.raw();
            let alpha = self.fades[index].step(1.0, factor);
            let color = self.job_color(ctx, &self.jobs[index]);
            marks.push((hovered, color, alpha));
            hovered_job = Some((hovered, color, &self.jobs[index]));
        }

        scoped(&mut *ctx.canvas, |canvas| {
            canvas.set_line_width(1.0);
            for (candidate, color, alpha) in &marks {
                canvas.set_fill(Paint::Solid(color.with_alpha(*alpha)));
                point(
                    canvas,
                    candidate.radius.unwrap_or_default(),
                    candidate.position(),
                    Some(*color),
                )?;
            }
            Ok(())
        })?;

        let Some((hovered, color, job)) = hovered_job else {
            return Ok(None);
        };
        Ok(Some(
            TooltipRequest::new(job.subtype.clone(), color)
                .with_hovered_point(hovered)
                .with_drawn_points(drawn_points)
                .with_row("Proportion Female", percent(job.proportion_female / 100.0, 0, 1))
                .with_row("Pay Gap", percent(job.pay_gap / 100.0, 0, 1))
                .with_row("Jobs (Female)", job.jobs_label())
                .with_mouse_in_plot(mouse_in_plot)
                .with_margin(TooltipMargin::Axes {
                    x: hovered.radius.unwrap_or_default(),
                    y: 0.0,
                })
                .with_animation_duration(cycle * 1.75),
        ))
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        let mut table = DataTable::new(
            "Show average gender pay gap by occupation in 2017",
            "Average gender pay gap by occupation (2017)",
        )
        .with_headers(["Job", "Jobs (Female)", "Proportion Female", "Pay Gap"])
        .with_row_headers();

        let columns = ["job_subtype", "num_jobs_female", "num_jobs", "proportion_female", "pay_gap"];
        for row in data.rows(&columns)? {
            table.push_row(vec![
                row.get("job_subtype").cloned().unwrap_or_default(),
                format!(
                    "{} ({})",
                    record_num(&row, "num_jobs")?,
                    record_num(&row, "num_jobs_female")?
                ),
                percent(record_num(&row, "proportion_female")? / 100.0, 0, 1),
                percent(record_num(&row, "pay_gap")? / 100.0, 0, 1),
            ])?;
        }
        Ok(table)
    }
}
