//! Present benchmark: Measure diff-based frame output.
//!
//! Target: < 500µs for a full 200×50 repaint

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessel::{BorderStyle, Rect, Renderer, StyleColor};

/// Fill the back buffer with varied content.
fn paint(renderer: &mut Renderer, seed: u8) {
    let (width, height) = renderer.size();
    for y in 0..height {
        let text: String = (0..width)
            .map(|x| char::from(b'A' + ((x + y + u16::from(seed)) % 26) as u8))
            .collect();
        let fg = StyleColor::rgb((y * 5) as u8, seed, 200);
        renderer.draw_text(0, i32::from(y), &text, fg, StyleColor::rgb(20, 20, 30));
    }
    renderer.draw_border(Rect::from_size(width, height), BorderStyle::Rounded, None, StyleColor::CYAN);
}

fn present_unchanged(c: &mut Criterion) {
    let mut renderer = Renderer::new(200, 50);
    paint(&mut renderer, 0);
    renderer.present(&mut Vec::new()).unwrap();

    c.bench_function("present_200x50_unchanged", |b| {
        b.iter(|| {
            let mut sink = Vec::with_capacity(4096);
            black_box(renderer.present(&mut sink).unwrap())
        });
    });
}

fn present_full_change(c: &mut Criterion) {
    let mut renderer = Renderer::new(200, 50);
    let mut seed = 0u8;

    c.bench_function("present_200x50_full_change", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            paint(&mut renderer, seed);
            let mut sink = Vec::with_capacity(64 * 1024);
            black_box(renderer.present(&mut sink).unwrap())
        });
    });
}

fn present_single_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("present_single_line");
    for (width, height) in [(80u16, 24u16), (200, 50)] {
        let mut renderer = Renderer::new(width, height);
        paint(&mut renderer, 0);
        renderer.present(&mut Vec::new()).unwrap();
        let mut tick = 0u32;

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &height,
            |b, &height| {
                b.iter(|| {
                    tick = tick.wrapping_add(1);
                    let status = format!("tick {tick:>10}");
                    renderer.draw_text(1, i32::from(height) - 2, &status, StyleColor::WHITE, StyleColor::BLUE);
                    let mut sink = Vec::with_capacity(256);
                    black_box(renderer.present(&mut sink).unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, present_unchanged, present_full_change, present_single_line);
criterion_main!(benches);
