//! Scanline flood fill

use log::trace;

use crate::buffer::{Color, PixelBuffer};

/// Repaint the 4-connected region of the seed's color with `new_color`.
///
/// Matching is exact ARGB equality against the color sampled once at the
/// seed. Seeds outside the canvas, or already `new_color`, are a no-op.
pub fn fill(buffer: &mut PixelBuffer, new_color: Color, seed_x: i32, seed_y: i32) {
    let Some(target) = buffer.get_pixel(seed_x, seed_y) else {
        return;
    };
    if target == new_color {
        return;
    }

    let matches = |buf: &PixelBuffer, x: i32, y: i32| buf.get_pixel(x, y) == Some(target);

    let mut stack = vec![(seed_x, seed_y)];
    let mut spans = 0usize;

    while let Some((x, y)) = stack.pop() {
        // A point pushed earlier may already be painted by a later span
        if !matches(buffer, x, y) {
            continue;
        }
        let mut lx = x;
        while matches(buffer, lx - 1, y) {
            lx -= 1;
        }
        let mut rx = x;
        while matches(buffer, rx + 1, y) {
            rx += 1;
        }
        buffer.hline(lx, rx, y, new_color);
        spans += 1;

        for ny in [y + 1, y - 1] {
            push_runs(buffer, target, lx, rx, ny, &mut stack);
        }
    }
    trace!("fill from ({}, {}): {} spans", seed_x, seed_y, spans);
}

/// Push one representative point per contiguous run of `target` in row `y`
/// between `lx` and `rx` inclusive
fn push_runs(
    buffer: &PixelBuffer,
    target: Color,
    lx: i32,
    rx: i32,
    y: i32,
    stack: &mut Vec<(i32, i32)>,
) {
    let mut in_run = false;
    for x in lx..=rx {
        if buffer.get_pixel(x, y) == Some(target) {
            if !in_run {
                stack.push((x, y));
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }
}
