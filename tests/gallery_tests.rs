use std::rc::Rc;

use chart_gallery::api::{ChartEvent, ChartLifecycle, FrameLoop, Gallery, GalleryConfig, StaticEnvironment};
use chart_gallery::core::{Dimensions, Theme};
use chart_gallery::default_gallery;
use chart_gallery::render::RecordingCanvas;

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

fn config() -> GalleryConfig {
    GalleryConfig::default()
        .with_data_dir(DATA_DIR)
        .with_shuffle_seed(7)
}

fn gallery_with(env: Rc<StaticEnvironment>) -> Gallery<RecordingCanvas> {
    default_gallery(&config(), env, Rc::new(Theme::default()), |dimensions: Dimensions| {
        RecordingCanvas::new(dimensions.width, dimensions.height)
    })
    .expect("gallery")
}

fn gallery() -> Gallery<RecordingCanvas> {
    gallery_with(Rc::new(StaticEnvironment::new()))
}

#[test]
fn menu_lists_the_charts_in_order_with_none_selected() {
    let gallery = gallery();
    let labels: Vec<String> = gallery.menu().into_iter().map(|entry| entry.label).collect();
    assert_eq!(
        labels,
        [
            "Climate Change",
            "Pay Gap",
            "Pay Gap by Job",
            "Tech Diversity: Gender",
            "Tech Diversity: Race",
        ]
    );
    assert!(gallery.menu().iter().all(|entry| !entry.selected));
    assert_eq!(gallery.active_id(), None);
}

#[test]
fn every_chart_draws_balanced_frames() {
    let mut gallery = gallery();
    let ids: Vec<_> = gallery.menu().into_iter().map(|entry| entry.id).collect();

    for id in ids {
        gallery.activate(id).expect("activate");
        for _ in 0..40 {
            assert!(gallery.draw_active(50.0).expect("draw"));
        }
        let chart = gallery.chart(id).expect("chart");
        assert_eq!(chart.canvas().save_depth(), 0, "{}", chart.name());
        chart.canvas().frame().validate().expect("valid frame");
        assert!(chart.data_table().is_some_and(|table| table.row_count() > 0));
    }
}

#[test]
fn activating_a_chart_destroys_the_previous_one() {
    let mut gallery = gallery();
    let menu = gallery.menu();
    let (first, second) = (menu[0].id, menu[1].id);

    gallery.activate(first).expect("first");
    gallery.activate(second).expect("second");

    assert_eq!(gallery.chart(first).expect("first").lifecycle(), ChartLifecycle::Inactive);
    assert_eq!(gallery.chart(second).expect("second").lifecycle(), ChartLifecycle::Active);
    let selected: Vec<_> = gallery.menu().into_iter().filter(|entry| entry.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, second);
}

#[test]
fn choosing_a_company_retitles_the_race_chart() {
    let mut gallery = gallery();
    let race = gallery.menu()[4].id;
    gallery.activate(race).expect("activate");
    gallery.draw_active(500.0).expect("draw");

    let chart = gallery.active_chart_mut().expect("active");
    assert_eq!(chart.title(), "Racial Representation at Amazon");
    chart.dispatch(ChartEvent::SelectionChanged { index: 1 }).expect("select");

    assert_eq!(chart.title(), "Racial Representation at Apple");
    assert_eq!(chart.clock().elapsed_time(), 0.0);
    chart.draw(16.0).expect("draw after change");
    assert!(chart.canvas().frame().texts().any(|text| text == "Racial Representation at Apple"));
}

#[test]
fn moving_the_slider_updates_the_climate_range() {
    let mut gallery = gallery();
    let climate = gallery.menu()[0].id;
    gallery.activate(climate).expect("activate");

    let chart = gallery.active_chart_mut().expect("active");
    chart
        .dispatch(ChartEvent::RangeChanged { start: 1950.0, end: 2000.0 })
        .expect("range");
    chart.draw(16.0).expect("draw");

    let slider = chart.elements().slider().expect("slider");
    assert_eq!(slider.get(), [1950.0, 2000.0]);
    assert_eq!(slider.bounds(), (1880.0, 2018.0));
}

#[test]
fn menu_selection_collapses_navigation_on_mobile() {
    let env = Rc::new(StaticEnvironment::new());
    env.set_mobile(true);
    let mut gallery = gallery_with(Rc::clone(&env));
    assert!(!gallery.is_navigation_open());

    assert!(gallery.toggle_navigation());
    let id = gallery.menu()[1].id;
    gallery.select_from_menu(id).expect("select");

    assert!(!gallery.is_navigation_open());
    assert_eq!(gallery.active_id(), Some(id));
}

#[test]
fn frame_loop_starts_with_a_zero_delta() {
    let mut gallery = gallery();
    let mut frames = FrameLoop::new();
    assert_eq!(frames.tick(0.0, &mut gallery).expect("stopped"), None);

    let pay_gap = gallery.menu()[1].id;
    gallery.activate(pay_gap).expect("activate");
    frames.start();
    assert_eq!(frames.tick(1_000.0, &mut gallery).expect("first"), Some(0.0));
    assert_eq!(frames.tick(1_016.0, &mut gallery).expect("second"), Some(16.0));
    assert_eq!(frames.tick(1_010.0, &mut gallery).expect("backwards"), Some(0.0));
    assert_eq!(
        gallery.active_chart().expect("active").clock().elapsed_time(),
        16.0
    );
}

#[test]
fn missing_data_is_an_io_error() {
    let config = GalleryConfig::default().with_data_dir("/nonexistent/gallery-data");
    let result = default_gallery(
        &config,
        Rc::new(StaticEnvironment::new()),
        Rc::new(Theme::default()),
        |dimensions: Dimensions| RecordingCanvas::new(dimensions.width, dimensions.height),
    );
    assert!(matches!(result, Err(chart_gallery::ChartError::Io { .. })));
}
