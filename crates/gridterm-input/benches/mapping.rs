use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use gridterm_core::{ClientRect, Dimensions, PointerEvent, ScreenPoint};
use gridterm_input::{map_to_cell, PointerDispatcher, PointerEvents, RawPointerEvent, RawPointerKind};
use gridterm_render::testing::MemoryConsole;

fn bench_map_to_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_to_cell");

    for size in [(25, 80), (50, 160), (100, 300)].iter() {
        let (rows, cols) = *size;
        let grid = Dimensions::new(rows, cols);
        let client = ClientRect::new(0, 0, cols as u32 * 8, rows as u32 * 16);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", cols, rows)),
            &(grid, client),
            |b, (grid, client)| {
                b.iter(|| {
                    for x in (0..client.width as i32).step_by(7) {
                        black_box(map_to_cell(ScreenPoint::new(x, 37), *client, *grid));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let console = Arc::new(MemoryConsole::new(Dimensions::new(25, 80)));
    console.set_client_rect(ClientRect::new(0, 0, 640, 400));
    let events = Arc::new(PointerEvents::new());
    for _ in 0..4 {
        events.pointer_move.subscribe(Arc::new(|event: &PointerEvent| {
            black_box(event.position);
        }));
    }
    let dispatcher = PointerDispatcher::new(console, Dimensions::new(25, 80), events);

    c.bench_function("dispatch_move_4_handlers", |b| {
        b.iter(|| {
            black_box(dispatcher.dispatch(RawPointerEvent::new(RawPointerKind::Move, 321, 123)))
        });
    });
}

criterion_group!(benches, bench_map_to_cell, bench_dispatch);
criterion_main!(benches);
