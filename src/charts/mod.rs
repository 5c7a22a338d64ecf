//! The gallery's chart behaviors and the drawing pieces they share.

pub mod axes;
pub mod climate_change;
pub mod emphasis;
pub mod line_path;
pub mod pay_gap;
pub mod pay_gap_by_job;
pub mod tech_diversity_gender;
pub mod tech_diversity_race;

use std::rc::Rc;

use tracing::info;

use crate::api::{Chart, ChartBehavior, ChartOptions, Environment, Gallery, GalleryConfig};
use crate::core::{CsvTable, Dimensions, Theme};
use crate::error::{ChartError, ChartResult};
use crate::render::Canvas;

pub use climate_change::ClimateChange;
pub use pay_gap::PayGap;
pub use pay_gap_by_job::PayGapByJob;
pub use tech_diversity_gender::TechDiversityGender;
pub use tech_diversity_race::TechDiversityRace;

pub const CLIMATE_CHANGE_CSV: &str = "surface-temperature/surface-temperature.csv";
pub const PAY_GAP_CSV: &str = "pay-gap/all-employees-hourly-pay-by-gender-1997-2017.csv";
pub const PAY_GAP_BY_JOB_CSV: &str = "pay-gap/occupation-hourly-pay-by-gender-2017.csv";
pub const GENDER_CSV: &str = "tech-diversity/gender-2018.csv";
pub const RACE_CSV: &str = "tech-diversity/race-2018.csv";

/// Tick and tooltip label of a year value.
pub(crate) fn year_label(year: f64) -> String {
    format!("{year:.0}")
}

/// Smallest and largest value of a numeric column.
pub(crate) fn column_extent(values: &[f64]) -> ChartResult<(f64, f64)> {
    if values.is_empty() {
        return Err(ChartError::EmptyTable);
    }
    Ok(values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(*value), max.max(*value))
        }))
}

/// Builds the five-chart gallery from the CSVs under `config.data_dir`.
///
/// `canvas_factory` is called once per chart with the size that chart wants.
/// Charts are registered in menu order; none is activated.
pub fn default_gallery<C, F>(
    config: &GalleryConfig,
    env: Rc<dyn Environment>,
    theme: Rc<Theme>,
    mut canvas_factory: F,
) -> ChartResult<Gallery<C>>
where
    C: Canvas,
    F: FnMut(Dimensions) -> ChartResult<C>,
{
    config.validate()?;
    let load = |relative: &str| CsvTable::from_path(config.resolve_data_path(relative));
    let padding = config.padding;
    let mut gallery = Gallery::new(Rc::clone(&env));

    let mut register = |dimensions: Dimensions,
                        options: ChartOptions,
                        data: CsvTable,
                        behavior: Box<dyn ChartBehavior>|
     -> ChartResult<()> {
        let options = options
            .with_animation_cycle_ms(config.animation_cycle_ms)
            .with_title_font_size(config.title_font_size);
        let chart = Chart::new(
            canvas_factory(dimensions)?,
            options,
            data,
            behavior,
            Rc::clone(&env),
            Rc::clone(&theme),
        )?;
        gallery.add_chart(chart);
        Ok(())
    };

    let data = load(CLIMATE_CHANGE_CSV)?;
    let chart = ClimateChange::new(&data, padding)?;
    register(config.dimensions, chart.options(), data, Box::new(chart))?;

    let data = load(PAY_GAP_CSV)?;
    let chart = PayGap::new(&data, padding)?;
    register(config.dimensions, chart.options(), data, Box::new(chart))?;

    let data = load(PAY_GAP_BY_JOB_CSV)?;
    let chart = PayGapByJob::new(&data, padding, config.shuffle_seed)?;
    register(config.dimensions, chart.options(), data, Box::new(chart))?;

    let data = load(GENDER_CSV)?;
    let chart = TechDiversityGender::new(&data, padding)?;
    register(config.gender_dimensions(), chart.options(), data, Box::new(chart))?;

    let data = load(RACE_CSV)?;
    let chart = TechDiversityRace::new(&data)?;
    register(config.race_dimensions(), chart.options(), data, Box::new(chart))?;

    info!(charts = gallery.len(), data_dir = %config.data_dir.display(), "gallery built");
    Ok(gallery)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_spans_the_column() {
        assert_eq!(column_extent(&[3.0, -1.5, 7.0]).expect("extent"), (-1.5, 7.0));
        assert!(matches!(column_extent(&[]), Err(ChartError::EmptyTable)));
    }

    #[test]
    fn years_have_no_fraction() {
        assert_eq!(year_label(1997.0), "1997");
        assert_eq!(year_label(2004.4), "2004");
    }
}
