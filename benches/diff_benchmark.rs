//! Diffing engine benchmark: Measure frame diff performance.
//!
//! Target: < 500µs for 200×50 frame

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stratum::buffer::diff::{render_diff, render_full};
use stratum::terminal::OutputBuffer;
use stratum::{Buffer, Cell, Color, Frame};

/// Create a frame with random-ish content for benchmarking.
fn create_test_frame(width: u16, height: u16, seed: u16) -> Frame {
    let mut buffer = Buffer::with_depth(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            let c = char::from(b'A' + ((x + y + seed) % 26) as u8);
            let cell = Cell::from_char(c)
                .with_fg(Color::rgb(
                    ((x * 3 + seed) % 256) as u8,
                    ((y * 7 + seed) % 256) as u8,
                    ((x + y + seed) % 256) as u8,
                ))
                .with_bg(Color::rgb(20, 20, 30));
            buffer.set(i32::from(x), i32::from(y), 0, cell);
        }
    }
    buffer.flatten()
}

fn bench_diff(c: &mut Criterion, name: &str, front: &Frame, back: &Frame) {
    let mut output = OutputBuffer::with_capacity(65536);
    c.bench_function(name, |b| {
        b.iter(|| {
            output.clear();
            render_diff(black_box(front), black_box(back), &mut output)
        })
    });
}

fn diff_identical_frames(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);
    bench_diff(c, "diff_200x50_identical", &frame, &frame.clone());
}

fn diff_single_cell_change(c: &mut Criterion) {
    let mut buffer = Buffer::with_depth(200, 50, 2);
    buffer.blit_frame(&create_test_frame(200, 50, 0), 0, 0, 0);
    let front = buffer.flatten();
    buffer.set(100, 25, 1, Cell::from_char('X').with_fg(Color::rgb(255, 0, 0)));
    bench_diff(c, "diff_200x50_single_change", &front, &buffer.flatten());
}

fn diff_line_change(c: &mut Criterion) {
    let mut buffer = Buffer::with_depth(200, 50, 2);
    buffer.blit_frame(&create_test_frame(200, 50, 0), 0, 0, 0);
    let front = buffer.flatten();
    buffer.draw_hline(0, 25, 1, 200, '*', stratum::Style::foreground(Color::rgb(255, 255, 0)));
    bench_diff(c, "diff_200x50_line_change", &front, &buffer.flatten());
}

fn diff_many_changes(c: &mut Criterion) {
    let front = create_test_frame(200, 50, 0);
    let back = create_test_frame(200, 50, 1);
    bench_diff(c, "diff_200x50_full_change", &front, &back);
}

fn full_render(c: &mut Criterion) {
    let frame = create_test_frame(200, 50, 0);
    let mut output = OutputBuffer::with_capacity(65536);

    c.bench_function("render_full_200x50", |b| {
        b.iter(|| {
            output.clear();
            render_full(black_box(&frame), &mut output)
        })
    });
}

fn diff_various_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let front = create_test_frame(width, height, 0);
        let back = create_test_frame(width, height, 1);

        group.bench_with_input(
            BenchmarkId::new("full_change", format!("{width}x{height}")),
            &(front, back),
            |b, (front, back)| {
                let mut output = OutputBuffer::with_capacity(65536);
                b.iter(|| {
                    output.clear();
                    render_diff(black_box(front), black_box(back), &mut output)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    diff_identical_frames,
    diff_single_cell_change,
    diff_line_change,
    diff_many_changes,
    full_render,
    diff_various_sizes,
);
criterion_main!(benches);
