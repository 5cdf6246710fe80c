//! Line and regular-shape rasterization

use std::f64::consts::PI;

use log::debug;

use super::{Brush, Shape};
use crate::buffer::{Color, PixelBuffer, Point};
use crate::error::{Error, Result};

/// Ratio between the outer and inner radius of a star
const STAR_INNER_RATIO: f64 = 2.5;

/// Walk the Bresenham path from `(x0, y0)` to `(x1, y1)`, calling `plot`
/// for every step including both endpoints.
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a one-pixel line using Bresenham's algorithm.
///
/// Pixels that fall outside the canvas are skipped; the rest of the line
/// is still drawn.
pub fn draw_line(buffer: &mut PixelBuffer, color: Color, x0: i32, y0: i32, x1: i32, y1: i32) {
    bresenham(x0, y0, x1, y1, |x, y| buffer.set_pixel(x, y, color));
}

/// Disc exactly `diameter` pixels across, anchored at `(cx, cy)`.
///
/// Odd discs are centred on the pixel; even ones on its top-left corner,
/// covering `cx - d/2 ..= cx + d/2 - 1`. Works in doubled coordinates so
/// both cases stay integral.
fn stamp_disc(buffer: &mut PixelBuffer, cx: i32, cy: i32, diameter: i32, color: Color) {
    let parity = 1 - diameter % 2;
    let d2 = diameter * diameter;
    for k in -(diameter / 2)..=(diameter - 1) / 2 {
        let dy = 2 * k + parity;
        let span = ((d2 - dy * dy) as f64).sqrt() as i32;
        let lo = -((span + parity) / 2);
        let hi = (span - parity) / 2;
        buffer.hline(cx + lo, cx + hi, cy + k, color);
    }
}

/// Draw a line with the brush thickness.
///
/// Thick strokes stamp a disc of the brush width at every Bresenham step,
/// which gives round caps and joins when consecutive segments share
/// endpoints.
pub fn stroke(buffer: &mut PixelBuffer, brush: &Brush, from: Point, to: Point) {
    if brush.thickness <= 1 {
        draw_line(buffer, brush.color, from.x, from.y, to.x, to.y);
        return;
    }
    let diameter = brush.thickness.min(i32::MAX as u32) as i32;
    bresenham(from.x, from.y, to.x, to.y, |x, y| {
        stamp_disc(buffer, x, y, diameter, brush.color);
    });
}

fn check_shape(shape: &Shape) -> Result<()> {
    if shape.vertices < 3 {
        return Err(Error::InvalidShape(shape.vertices));
    }
    Ok(())
}

#[inline]
fn vertex(center: Point, radius: f64, angle: f64) -> Point {
    // Truncation toward zero, as the paint tools always did
    Point::new(
        (center.x as f64 + radius * angle.cos()) as i32,
        (center.y as f64 + radius * angle.sin()) as i32,
    )
}

/// Vertices of a regular polygon centred on `center`
pub fn polygon_vertices(center: Point, shape: &Shape) -> Result<Vec<Point>> {
    check_shape(shape)?;
    let n = shape.vertices;
    let step = 2.0 * PI / n as f64;
    let offset = shape.rotation_deg.to_radians();
    Ok((0..n)
        .map(|i| vertex(center, shape.radius, offset + i as f64 * step))
        .collect())
}

/// Vertices of an n-pointed star: `2n` points alternating between the outer
/// radius and `radius / 2.5`
pub fn star_vertices(center: Point, shape: &Shape) -> Result<Vec<Point>> {
    check_shape(shape)?;
    let count = 2 * shape.vertices;
    let step = PI / shape.vertices as f64;
    let offset = shape.rotation_deg.to_radians();
    Ok((0..count)
        .map(|i| {
            let radius = if i % 2 == 0 {
                shape.radius
            } else {
                shape.radius / STAR_INNER_RATIO
            };
            vertex(center, radius, offset + i as f64 * step)
        })
        .collect())
}

/// Connect consecutive vertices, then the last back to the first
pub fn draw_closed(buffer: &mut PixelBuffer, brush: &Brush, vertices: &[Point]) {
    let n = vertices.len();
    for i in 0..n {
        stroke(buffer, brush, vertices[i], vertices[(i + 1) % n]);
    }
}

pub fn draw_polygon(
    buffer: &mut PixelBuffer,
    brush: &Brush,
    center: Point,
    shape: &Shape,
) -> Result<()> {
    let vertices = polygon_vertices(center, shape)?;
    debug!("polygon: {} vertices around ({}, {})", vertices.len(), center.x, center.y);
    draw_closed(buffer, brush, &vertices);
    Ok(())
}

pub fn draw_star(buffer: &mut PixelBuffer, brush: &Brush, center: Point, shape: &Shape) -> Result<()> {
    let vertices = star_vertices(center, shape)?;
    debug!("star: {} vertices around ({}, {})", vertices.len(), center.x, center.y);
    draw_closed(buffer, brush, &vertices);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::filled(w, h, Color::WHITE).unwrap()
    }

    fn painted(buf: &PixelBuffer, color: Color) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..buf.height() as usize {
            for x in 0..buf.width() as usize {
                if buf.at(x, y) == color {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_horizontal_line_paints_both_endpoints() {
        let mut buf = canvas(8, 3);
        draw_line(&mut buf, Color::BLACK, 0, 0, 5, 0);
        let px = painted(&buf, Color::BLACK);
        assert_eq!(px, (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_direction_does_not_matter_for_diagonals() {
        let mut a = canvas(6, 6);
        let mut b = canvas(6, 6);
        draw_line(&mut a, Color::BLACK, 0, 0, 5, 5);
        draw_line(&mut b, Color::BLACK, 5, 5, 0, 0);
        assert_eq!(a, b);
        assert_eq!(painted(&a, Color::BLACK).len(), 6);
    }

    #[test]
    fn test_line_partially_off_canvas() {
        let mut buf = canvas(4, 4);
        draw_line(&mut buf, Color::BLACK, -10, 1, 10, 1);
        assert_eq!(painted(&buf, Color::BLACK).len(), 4);
        // Entirely outside: nothing happens, no panic
        draw_line(&mut buf, Color::BLACK, -5, -5, -1, -9);
        assert_eq!(painted(&buf, Color::BLACK).len(), 4);
    }

    #[test]
    fn test_single_point_line() {
        let mut buf = canvas(3, 3);
        draw_line(&mut buf, Color::BLACK, 1, 1, 1, 1);
        assert_eq!(painted(&buf, Color::BLACK), vec![(1, 1)]);
    }

    #[test]
    fn test_thick_stroke_covers_neighbours() {
        let mut buf = canvas(20, 20);
        let brush = Brush::new(Color::BLACK, 5);
        stroke(&mut buf, &brush, Point::new(5, 10), Point::new(15, 10));
        assert_eq!(buf.at(10, 8), Color::BLACK);
        assert_eq!(buf.at(10, 12), Color::BLACK);
        // Round cap extends past the endpoint
        assert_eq!(buf.at(3, 10), Color::BLACK);
        assert_eq!(buf.at(10, 14), Color::WHITE);
    }

    #[test]
    fn test_stroke_width_matches_thickness() {
        for thickness in 2..=6u32 {
            let brush = Brush::new(Color::BLACK, thickness);
            let mut flat = canvas(30, 30);
            stroke(&mut flat, &brush, Point::new(8, 15), Point::new(22, 15));
            let rows = (0..30).filter(|&y| flat.at(15, y) == Color::BLACK).count();
            assert_eq!(rows as u32, thickness, "horizontal, thickness {}", thickness);

            let mut upright = canvas(30, 30);
            stroke(&mut upright, &brush, Point::new(15, 8), Point::new(15, 22));
            let cols = (0..30).filter(|&x| upright.at(x, 15) == Color::BLACK).count();
            assert_eq!(cols as u32, thickness, "vertical, thickness {}", thickness);
        }
    }

    #[test]
    fn test_even_stroke_covers_anchor_and_up_left() {
        let mut buf = canvas(10, 10);
        stroke(&mut buf, &Brush::new(Color::BLACK, 2), Point::new(5, 5), Point::new(5, 5));
        assert_eq!(
            painted(&buf, Color::BLACK),
            vec![(4, 4), (5, 4), (4, 5), (5, 5)]
        );
    }

    #[test]
    fn test_polygon_vertices_on_axes() {
        let shape = Shape {
            vertices: 4,
            radius: 10.0,
            rotation_deg: 0.0,
        };
        let v = polygon_vertices(Point::new(50, 50), &shape).unwrap();
        assert_eq!(v[0], Point::new(60, 50));
        assert_eq!(v[1], Point::new(50, 60));
        assert_eq!(v[2], Point::new(40, 50));
        assert_eq!(v[3], Point::new(50, 40));
    }

    #[test]
    fn test_star_alternates_radii() {
        let shape = Shape {
            vertices: 5,
            radius: 50.0,
            rotation_deg: 0.0,
        };
        let v = star_vertices(Point::new(0, 0), &shape).unwrap();
        assert_eq!(v.len(), 10);
        assert_eq!(v[0], Point::new(50, 0));
        let inner = ((v[1].x * v[1].x + v[1].y * v[1].y) as f64).sqrt();
        assert!((inner - 20.0).abs() < 1.5, "inner radius {}", inner);
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        let shape = Shape {
            vertices: 2,
            ..Shape::default()
        };
        let mut buf = canvas(4, 4);
        assert!(matches!(
            draw_polygon(&mut buf, &Brush::default(), Point::new(1, 1), &shape),
            Err(Error::InvalidShape(2))
        ));
    }

    #[test]
    fn test_polygon_is_closed() {
        let mut buf = canvas(100, 100);
        let shape = Shape {
            vertices: 3,
            radius: 30.0,
            rotation_deg: 90.0,
        };
        draw_polygon(&mut buf, &Brush::default(), Point::new(50, 50), &shape).unwrap();
        for v in polygon_vertices(Point::new(50, 50), &shape).unwrap() {
            assert_eq!(buf.get_pixel(v.x, v.y), Some(Color::BLACK));
        }
    }
}
