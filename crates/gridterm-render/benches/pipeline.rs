use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridterm_core::{CellStyle, Color, Dimensions};
use gridterm_render::crossterm_console::encode_region;
use gridterm_render::{render_iteration, BufferPipeline, PaintContext, PaintFn};

/// Fill the active buffer with a striped pattern so every row has style changes
fn striped_paint() -> Box<PaintFn> {
    Box::new(|ctx: &mut PaintContext<'_>| {
        let width = ctx.width();
        for row in 0..ctx.height() {
            let style = if row % 2 == 0 {
                CellStyle::new(Color::White, Color::Blue)
            } else {
                CellStyle::new(Color::Black, Color::Cyan)
            };
            for col in (0..width).step_by(8) {
                ctx.buffer_mut().put_str(row, col, "gridterm", style);
            }
        }
    })
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_to_front");

    for size in [(25, 80), (50, 160), (100, 320)].iter() {
        let (rows, cols) = *size;
        let pipeline =
            BufferPipeline::initialize(Dimensions::new(rows, cols), CellStyle::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &pipeline,
            |b, pipeline| b.iter(|| black_box(pipeline.snapshot_to_front().unwrap())),
        );
    }

    group.finish();
}

fn bench_render_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_iteration");
    let paint = striped_paint();

    for size in [(25, 80), (50, 160)].iter() {
        let (rows, cols) = *size;
        let pipeline =
            BufferPipeline::initialize(Dimensions::new(rows, cols), CellStyle::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &pipeline,
            |b, pipeline| b.iter(|| render_iteration(pipeline, Some(paint.as_ref()), 0)),
        );
    }

    group.finish();
}

fn bench_encode_region(c: &mut Criterion) {
    let pipeline =
        BufferPipeline::initialize(Dimensions::new(25, 80), CellStyle::default()).unwrap();
    let paint = striped_paint();
    render_iteration(&pipeline, Some(paint.as_ref()), 0);
    let front = pipeline.front_snapshot();
    let region = front.dimensions().bounds();

    c.bench_function("encode_region_80x25", |b| {
        let mut out = Vec::with_capacity(64 * 1024);
        b.iter(|| {
            out.clear();
            encode_region(black_box(&front), region, &mut out).unwrap();
            black_box(out.len())
        })
    });
}

criterion_group!(
    benches,
    bench_snapshot,
    bench_render_iteration,
    bench_encode_region
);
criterion_main!(benches);
