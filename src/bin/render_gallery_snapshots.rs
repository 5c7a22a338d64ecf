#[cfg(feature = "cairo-backend")]
use std::fs;
#[cfg(feature = "cairo-backend")]
use std::path::PathBuf;

#[cfg(feature = "cairo-backend")]
const DEFAULT_OUTPUT_ROOT: &str = "target/gallery_snapshots";
#[cfg(feature = "cairo-backend")]
const DEFAULT_ELAPSED_MS: f64 = 6000.0;
#[cfg(feature = "cairo-backend")]
const FRAME_MS: f64 = 1000.0 / 60.0;

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    config_path: Option<PathBuf>,
    output_root: PathBuf,
    elapsed_ms: f64,
    dark: bool,
    reduced_motion: bool,
    only_chart: Option<String>,
}

#[cfg(feature = "cairo-backend")]
fn main() {
    let _ = chart_gallery::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    use std::rc::Rc;

    use chart_gallery::api::{GalleryConfig, StaticEnvironment};
    use chart_gallery::core::{Dimensions, Theme};
    use chart_gallery::render::CairoCanvas;

    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => GalleryConfig::from_path(path)
            .map_err(|err| format!("failed to load config `{}`: {err}", path.display()))?,
        None => GalleryConfig::default(),
    };
    let env = Rc::new(
        StaticEnvironment::new()
            .with_dark(args.dark)
            .with_reduced_motion(args.reduced_motion),
    );
    let mut gallery = chart_gallery::default_gallery(
        &config,
        env,
        Rc::new(Theme::default()),
        |dimensions: Dimensions| {
            CairoCanvas::new(dimensions.width.round() as i32, dimensions.height.round() as i32)
        },
    )
    .map_err(|err| format!("failed to build gallery: {err}"))?;

    fs::create_dir_all(&args.output_root).map_err(|err| {
        format!(
            "failed to create output dir `{}`: {err}",
            args.output_root.display()
        )
    })?;

    let ids: Vec<_> = gallery
        .menu()
        .into_iter()
        .filter(|entry| {
            args.only_chart
                .as_ref()
                .is_none_or(|name| file_stem(&entry.label) == file_stem(name))
        })
        .collect();
    if ids.is_empty() {
        return Err("no chart matches `--only`".to_owned());
    }

    for entry in ids {
        gallery
            .activate(entry.id)
            .map_err(|err| format!("chart `{}` activation failed: {err}", entry.label))?;
        let mut elapsed = 0.0;
        gallery
            .draw_active(0.0)
            .map_err(|err| format!("chart `{}` draw failed: {err}", entry.label))?;
        while elapsed < args.elapsed_ms {
            elapsed += FRAME_MS;
            gallery
                .draw_active(FRAME_MS)
                .map_err(|err| format!("chart `{}` draw failed: {err}", entry.label))?;
        }

        let output_path = args.output_root.join(format!("{}.png", file_stem(&entry.label)));
        let chart = gallery
            .chart(entry.id)
            .map_err(|err| format!("chart `{}` vanished: {err}", entry.label))?;
        chart
            .canvas()
            .write_png(&output_path)
            .map_err(|err| format!("failed to write png `{}`: {err}", output_path.display()))?;
        println!("rendered {} -> {}", entry.label, output_path.display());
    }
    Ok(())
}

/// Lower-case, dash-separated file name for a chart name.
#[cfg(feature = "cairo-backend")]
fn file_stem(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut config_path = None;
    let mut output_root = PathBuf::from(DEFAULT_OUTPUT_ROOT);
    let mut elapsed_ms = DEFAULT_ELAPSED_MS;
    let mut dark = false;
    let mut reduced_motion = false;
    let mut only_chart = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config_path = Some(PathBuf::from(value));
            }
            "--output-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-root".to_owned())?;
                output_root = PathBuf::from(value);
            }
            "--elapsed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --elapsed".to_owned())?;
                elapsed_ms = value
                    .parse::<f64>()
                    .ok()
                    .filter(|ms| ms.is_finite() && *ms >= 0.0)
                    .ok_or_else(|| format!("invalid --elapsed value `{value}`"))?;
            }
            "--only" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --only".to_owned())?;
                only_chart = Some(value);
            }
            "--dark" => dark = true,
            "--reduced-motion" => reduced_motion = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    Ok(CliArgs {
        config_path,
        output_root,
        elapsed_ms,
        dark,
        reduced_motion,
        only_chart,
    })
}

#[cfg(feature = "cairo-backend")]
fn print_usage() {
    println!("{}", usage_message());
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend,telemetry --bin render_gallery_snapshots -- [options]\n\nOptions:\n  --config <path>        Gallery config JSON (default: built-in config)\n  --output-root <path>   Directory for the PNG files (default: {DEFAULT_OUTPUT_ROOT})\n  --elapsed <ms>         Animation time to render at (default: {DEFAULT_ELAPSED_MS})\n  --only <chart-name>    Render a single chart, e.g. `pay-gap`\n  --dark                 Use the dark palette\n  --reduced-motion       Skip animations\n  -h, --help             Show this message"
    )
}
