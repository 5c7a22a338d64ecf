#[cfg(feature = "desktop")]
use std::rc::Rc;

#[cfg(feature = "desktop")]
use chart_gallery::api::{ChartId, GalleryConfig, StaticEnvironment};
#[cfg(feature = "desktop")]
use chart_gallery::core::{Dimensions, Theme};
#[cfg(feature = "desktop")]
use chart_gallery::platform_gtk::GtkGalleryHost;
#[cfg(feature = "desktop")]
use chart_gallery::render::CairoCanvas;
#[cfg(feature = "desktop")]
use gtk4 as gtk;
#[cfg(feature = "desktop")]
use gtk4::prelude::*;

#[cfg(feature = "desktop")]
fn main() -> gtk::glib::ExitCode {
    let _ = chart_gallery::telemetry::init_default_tracing();
    let app = gtk::Application::builder()
        .application_id("rs.chart.gallery.viewer")
        .build();
    app.connect_activate(build_ui);
    // GTK would otherwise try to interpret the gallery flags.
    app.run_with_args::<&str>(&[])
}

#[cfg(not(feature = "desktop"))]
fn main() {
    eprintln!("this viewer requires feature `desktop`");
    std::process::exit(1);
}

#[cfg(feature = "desktop")]
fn build_ui(app: &gtk::Application) {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load gallery config: {err}");
            return;
        }
    };

    let prefer_dark = gtk::Settings::default()
        .is_some_and(|settings| settings.is_gtk_application_prefer_dark_theme());
    let env = Rc::new(
        StaticEnvironment::new()
            .with_dark(prefer_dark || std::env::args().any(|arg| arg == "--dark"))
            .with_reduced_motion(std::env::args().any(|arg| arg == "--reduced-motion")),
    );

    let gallery = chart_gallery::default_gallery(
        &config,
        env,
        Rc::new(Theme::default()),
        |dimensions: Dimensions| {
            CairoCanvas::new(dimensions.width.round() as i32, dimensions.height.round() as i32)
        },
    );
    let host = gallery.and_then(|gallery| {
        let initial = u32::try_from(config.initial_chart).unwrap_or(0);
        GtkGalleryHost::new(gallery, ChartId::new(initial))
    });
    let host = match host {
        Ok(host) => host,
        Err(err) => {
            eprintln!("failed to build gallery: {err}");
            return;
        }
    };

    let window = gtk::ApplicationWindow::builder()
        .application(app)
        .title("Chart Gallery")
        .default_width(config.dimensions.width.round() as i32 + 240)
        .default_height(config.dimensions.height.round() as i32 + 160)
        .build();
    window.set_child(Some(host.widget()));
    window.present();
}

#[cfg(feature = "desktop")]
fn load_config() -> chart_gallery::ChartResult<GalleryConfig> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return GalleryConfig::from_path(path);
        }
    }
    Ok(GalleryConfig::default())
}
