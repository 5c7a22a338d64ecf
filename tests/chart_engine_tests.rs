use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use chart_gallery::api::{
    Chart, ChartBehavior, ChartEvent, ChartId, ChartLifecycle, ChartOptions, DataTable, DrawContext,
    Environment, HookContext, HostElement, SelectControl, StaticEnvironment,
};
use chart_gallery::charts::{ClimateChange, PayGap};
use chart_gallery::core::math::map;
use chart_gallery::core::{Cartesian, CsvTable, Dimensions, Theme};
use chart_gallery::error::{ChartError, ChartResult};
use chart_gallery::interaction::{DisplayRect, TooltipRequest};
use chart_gallery::render::RecordingCanvas;

const PAY_GAP_CSV: &str = "year,median_male,median_female,pay_gap\n\
                           1997,9.1,7.25,20.2\n\
                           1998,9.5,7.5,21.5\n\
                           1999,10,8,20\n";

const CLIMATE_CSV: &str = "year,temperature\n\
                           2000,14.3\n\
                           2005,14.5\n\
                           2010,14.6\n";

fn reduced_motion() -> Rc<dyn Environment> {
    Rc::new(StaticEnvironment::new().with_reduced_motion(true))
}

fn pay_gap_chart(env: Rc<dyn Environment>) -> Chart<RecordingCanvas> {
    let data = CsvTable::parse(PAY_GAP_CSV).expect("csv");
    let behavior = PayGap::new(&data, 50.0).expect("pay gap");
    let options = behavior.options();
    Chart::new(
        RecordingCanvas::new(800.0, 400.0).expect("canvas"),
        options,
        data,
        Box::new(behavior),
        env,
        Rc::new(Theme::default()),
    )
    .expect("chart")
}

/// Records which hooks ran, in order.
#[derive(Default)]
struct HookLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl ChartBehavior for HookLog {
    fn draw(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
        self.calls.borrow_mut().push("draw".to_owned());
        Ok(None)
    }

    fn build_table(&self, data: &CsvTable) -> ChartResult<DataTable> {
        self.calls.borrow_mut().push("table".to_owned());
        let mut table = DataTable::new("Show values", "Values").with_headers(["value"]);
        for value in data.column("value")? {
            table.push_row(vec![value.to_owned()])?;
        }
        Ok(table)
    }

    fn preload(&mut self, ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.calls.borrow_mut().push("preload".to_owned());
        ctx.elements.push(HostElement::Select(SelectControl::new(vec![
            "first".to_owned(),
            "second".to_owned(),
        ])?));
        Ok(())
    }

    fn setup(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.calls.borrow_mut().push("setup".to_owned());
        Ok(())
    }

    fn destroy(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.calls.borrow_mut().push("destroy".to_owned());
        Ok(())
    }

    fn on_event(&mut self, event: ChartEvent, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
        self.calls.borrow_mut().push(format!("{event:?}"));
        Ok(())
    }
}

fn logged_chart() -> (Chart<RecordingCanvas>, Rc<RefCell<Vec<String>>>) {
    let behavior = HookLog::default();
    let calls = Rc::clone(&behavior.calls);
    let chart = Chart::new(
        RecordingCanvas::new(640.0, 360.0).expect("canvas"),
        ChartOptions::new("Log", "Hook Log"),
        CsvTable::parse("value\n1\n2\n").expect("csv"),
        Box::new(behavior),
        Rc::new(StaticEnvironment::new()),
        Rc::new(Theme::default()),
    )
    .expect("chart");
    (chart, calls)
}

#[test]
fn lifecycle_hooks_run_in_order_and_preload_runs_once() {
    let (mut chart, calls) = logged_chart();
    assert_eq!(chart.lifecycle(), ChartLifecycle::Constructed);

    chart.setup(ChartId::new(4)).expect("setup");
    chart.draw(16.0).expect("draw");
    chart.destroy().expect("destroy");
    chart.setup(ChartId::new(4)).expect("setup again");

    assert_eq!(
        *calls.borrow(),
        ["table", "preload", "setup", "draw", "destroy", "setup"]
    );
    assert_eq!(chart.lifecycle(), ChartLifecycle::Active);
    assert_eq!(chart.id(), Some(ChartId::new(4)));
}

#[test]
fn data_table_is_the_last_element() {
    let (mut chart, _) = logged_chart();
    chart.preload().expect("preload");

    let kinds: Vec<&str> = chart.elements().iter().map(HostElement::kind).collect();
    assert_eq!(kinds.last(), Some(&"data_table"));
    assert_eq!(chart.data_table().expect("table").row_count(), 2);
}

#[test]
fn unchanged_events_are_not_forwarded() {
    let (mut chart, calls) = logged_chart();
    chart.setup(ChartId::new(0)).expect("setup");
    calls.borrow_mut().clear();

    chart.dispatch(ChartEvent::SelectionChanged { index: 0 }).expect("same option");
    chart.dispatch(ChartEvent::SelectionChanged { index: 1 }).expect("new option");
    chart.dispatch(ChartEvent::RangeChanged { start: 1.0, end: 2.0 }).expect("no slider");
    chart.dispatch(ChartEvent::Resized { display_scale: 0.5 }).expect("resize");

    assert_eq!(
        *calls.borrow(),
        [
            "SelectionChanged { index: 1 }".to_owned(),
            "Resized { display_scale: 0.5 }".to_owned(),
        ]
    );
}

#[test]
fn destroy_before_setup_only_runs_the_hook() {
    let (mut chart, calls) = logged_chart();
    chart.destroy().expect("destroy");
    assert_eq!(*calls.borrow(), ["destroy"]);
    assert_eq!(chart.lifecycle(), ChartLifecycle::Constructed);
    assert!(!chart.pointer().is_attached());

    chart.setup(ChartId::new(1)).expect("setup after destroy");
    assert_eq!(*calls.borrow(), ["destroy", "table", "preload", "setup"]);
    assert_eq!(chart.lifecycle(), ChartLifecycle::Active);
}

#[test]
fn failing_title_measurement_rejects_the_chart() {
    let mut canvas = RecordingCanvas::new(640.0, 360.0).expect("canvas");
    canvas.set_measurement_failure(true);
    let result = Chart::new(
        canvas,
        ChartOptions::new("Log", "Hook Log"),
        CsvTable::parse("value\n1\n").expect("csv"),
        Box::new(HookLog::default()),
        Rc::new(StaticEnvironment::new()),
        Rc::new(Theme::default()),
    );
    assert!(matches!(result, Err(ChartError::TextMeasurement(_))));
}

#[test]
fn every_frame_clears_and_draws_the_title() {
    let mut chart = pay_gap_chart(reduced_motion());
    chart.setup(ChartId::new(0)).expect("setup");

    chart.draw(16.0).expect("first frame");
    chart.draw(16.0).expect("second frame");

    let canvas = chart.canvas();
    assert_eq!(canvas.frames_cleared(), 2);
    assert_eq!(canvas.save_depth(), 0);
    assert!(canvas.frame().texts().any(|text| text == chart.title()));
    canvas.frame().validate().expect("balanced frame");
}

#[test]
fn hovering_a_year_shows_its_pay_gap() {
    let mut chart = pay_gap_chart(reduced_motion());
    chart.setup(ChartId::new(0)).expect("setup");
    let layout = chart.layout();
    let x = map(1998.0, 1997.0, 1999.0, layout.left, layout.right);

    chart.pointer_move(
        Cartesian::new(x, layout.center_y()),
        DisplayRect::unscaled(chart.dimensions()),
    );
    chart.draw(16.0).expect("draw");

    let state = chart.tooltip_state();
    assert!(state.last.is_some());
    assert_eq!(state.rendered, state.last);
    let texts: Vec<&str> = chart.canvas().frame().texts().collect();
    assert!(texts.contains(&"1998"));
    assert!(texts.contains(&"Pay gap: 21.5%"));
    assert_eq!(chart.canvas().save_depth(), 0);
}

#[test]
fn leaving_the_canvas_clears_the_tooltip() {
    let mut chart = pay_gap_chart(reduced_motion());
    chart.setup(ChartId::new(0)).expect("setup");
    let layout = chart.layout();

    chart.pointer_move(
        Cartesian::new(layout.center_x(), layout.center_y()),
        DisplayRect::unscaled(chart.dimensions()),
    );
    chart.draw(16.0).expect("hovered");
    assert!(chart.tooltip_state().last.is_some());

    chart.pointer_leave();
    chart.draw(16.0).expect("left");
    assert_eq!(chart.tooltip_state().last, None);
    assert!(!chart.canvas().frame().texts().any(|text| text.starts_with("Pay gap:")));
}

#[test]
fn scaled_display_maps_back_to_backing_pixels() {
    let mut chart = pay_gap_chart(reduced_motion());
    chart.setup(ChartId::new(0)).expect("setup");
    let half = DisplayRect::new(10.0, 20.0, 400.0, 200.0);

    chart.pointer_move(Cartesian::new(210.0, 120.0), half);

    assert_eq!(chart.pointer().position(), Cartesian::new(400.0, 200.0));
    assert_eq!(chart.dimensions(), Dimensions::new(800.0, 400.0));
}

#[test]
fn reduced_motion_draws_pay_gap_points_at_full_size_on_the_first_frame() {
    let mut chart = pay_gap_chart(reduced_motion());
    chart.setup(ChartId::new(0)).expect("setup");
    chart.draw(16.0).expect("first frame");

    let radii: Vec<f64> = chart.canvas().frame().arc_radii().collect();
    assert_eq!(radii, [5.0, 5.0, 5.0]);
}

#[test]
fn reduced_motion_draws_climate_points_at_full_size_on_the_first_frame() {
    let data = CsvTable::parse(CLIMATE_CSV).expect("csv");
    let behavior = ClimateChange::new(&data, 50.0).expect("climate");
    let options = behavior.options();
    let mut chart = Chart::new(
        RecordingCanvas::new(800.0, 400.0).expect("canvas"),
        options,
        data,
        Box::new(behavior),
        reduced_motion(),
        Rc::new(Theme::default()),
    )
    .expect("chart");
    chart.setup(ChartId::new(0)).expect("setup");
    chart.draw(16.0).expect("first frame");

    let radii: Vec<f64> = chart.canvas().frame().arc_radii().collect();
    assert_eq!(radii.len(), 3);
    for radius in radii {
        assert_abs_diff_eq!(radius, 4.5, epsilon = 1e-9);
    }
}
