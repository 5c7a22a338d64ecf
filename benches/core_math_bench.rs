use chart_gallery::charts::line_path::LinePath;
use chart_gallery::core::format::{gbp, percent};
use chart_gallery::core::math::{ease_out_elastic, ease_out_expo_inv};
use chart_gallery::core::{Cartesian, CsvTable, HoverCandidate, PointId};
use chart_gallery::interaction::find_hovered_point;
use chart_gallery::render::{Canvas, RecordingCanvas};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_easing(c: &mut Criterion) {
    c.bench_function("easing_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..1_000 {
                let x = f64::from(i) / 1_000.0;
                acc += ease_out_elastic(black_box(x)) + ease_out_expo_inv(black_box(x));
            }
            acc
        })
    });
}

fn bench_hover_search_1k(c: &mut Criterion) {
    let candidates: Vec<HoverCandidate> = (0..1_000)
        .map(|i| HoverCandidate::new(PointId::new(i), i as f64 * 1.5, (i as f64 / 25.0).sin() * 200.0 + 300.0))
        .collect();
    let pointer = Cartesian::new(742.0, 310.0);

    c.bench_function("hover_search_box_1k", |b| {
        b.iter(|| {
            find_hovered_point(
                black_box(&candidates),
                black_box(pointer),
                Some(Cartesian::splat(f64::INFINITY)),
            )
            .expect("box search")
            .map(|candidate| candidate.id)
        })
    });
}

fn bench_line_path_trace_140(c: &mut Criterion) {
    let vertices: Vec<(f64, Cartesian)> = (0..140)
        .map(|i| {
            let year = 1880.0 + f64::from(i);
            (year, Cartesian::new(f64::from(i) * 7.0, (f64::from(i) / 9.0).cos() * 120.0 + 280.0))
        })
        .collect();
    let mut canvas = RecordingCanvas::new(1024.0, 576.0).expect("canvas");

    c.bench_function("line_path_trace_140", |b| {
        b.iter(|| {
            let path = LinePath::new(black_box(&vertices));
            canvas.begin_path();
            path.trace(&mut canvas, path.total_length() * 0.7, |_| true, |vertex| vertex);
            path.timed_points(3_200.0, 100.0).len()
        })
    });
}

fn bench_csv_parse(c: &mut Criterion) {
    let mut raw = String::from("year,temperature\n");
    for year in 1880..2019 {
        raw.push_str(&format!("{year},{:.2}\n", (f64::from(year) / 17.0).sin() * 0.6));
    }

    c.bench_function("csv_parse_surface_temperature", |b| {
        b.iter(|| {
            let table = CsvTable::parse(black_box(&raw)).expect("csv");
            table.column_nums("temperature").expect("temperatures").len()
        })
    });
}

fn bench_number_formatting(c: &mut Criterion) {
    c.bench_function("format_percent_and_gbp", |b| {
        b.iter(|| (percent(black_box(0.1834), 0, 1), gbp(black_box(12_345.678), 0, 2)))
    });
}

criterion_group!(
    benches,
    bench_easing,
    bench_hover_search_1k,
    bench_line_path_trace_140,
    bench_csv_parse,
    bench_number_formatting
);
criterion_main!(benches);
