//! Cell benchmark: comparison, construction and layered writes.
//!
//! Target: < 1ns per comparison

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum::{Buffer, Cell, Color, Modifiers, Style};

fn cell_equality_same(c: &mut Criterion) {
    let cell_a = Cell::from_char('A')
        .with_fg(Color::rgb(255, 128, 64))
        .with_bg(Color::rgb(32, 32, 32))
        .with_modifiers(Modifiers::BOLD);
    let cell_b = cell_a;

    c.bench_function("cell_eq_same", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_equality_different_char(c: &mut Criterion) {
    let cell_a = Cell::from_char('A');
    let cell_b = Cell::from_char('B');

    c.bench_function("cell_eq_diff_char", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_equality_different_color(c: &mut Criterion) {
    let cell_a = Cell::from_char('A').with_fg(Color::rgb(255, 0, 0));
    let cell_b = Cell::from_char('A').with_fg(Color::rgb(0, 255, 0));

    c.bench_function("cell_eq_diff_color", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_is_empty(c: &mut Criterion) {
    let empty = Cell::EMPTY;
    let styled = Cell::new(' ', Style::default().with_reverse());

    c.bench_function("cell_is_empty", |b| {
        b.iter(|| black_box(&empty).is_empty() && !black_box(&styled).is_empty())
    });
}

fn buffer_draw_text(c: &mut Criterion) {
    let mut buffer = Buffer::new(200, 50);
    let style = Style::default().with_bold();

    c.bench_function("buffer_draw_text_200x50", |b| {
        b.iter(|| {
            for y in 0..50 {
                buffer.draw_text(0, y, 1, black_box("the quick brown fox jumps over the lazy dog"), style);
            }
        })
    });
}

fn buffer_flatten(c: &mut Criterion) {
    let mut buffer = Buffer::new(200, 50);
    buffer.fill(Cell::from_char('.'));
    buffer.draw_box(10, 5, 3, 60, 20, Style::default());
    let mut frame = buffer.flatten();

    c.bench_function("buffer_flatten_200x50", |b| {
        b.iter(|| buffer.flatten_into(black_box(&mut frame)))
    });
}

criterion_group!(
    benches,
    cell_equality_same,
    cell_equality_different_char,
    cell_equality_different_color,
    cell_is_empty,
    buffer_draw_text,
    buffer_flatten,
);
criterion_main!(benches);
