use crate::braille::BrailleCanvas;
use crate::map::projection::Projection;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a filled circle (for point events)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Project and draw a geographic polyline, skipping segments that jump
/// across the canvas (antimeridian wraps)
pub fn draw_geo_line(canvas: &mut BrailleCanvas, line: &[(f64, f64)], projection: &Projection) {
    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = projection.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < projection.width() {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::ProjectionConfig;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_circle_marks_center() {
        let mut canvas = BrailleCanvas::new(4, 2);
        draw_circle(&mut canvas, 4, 4, 2);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_geo_line_draws_something() {
        let mut canvas = BrailleCanvas::new(40, 20);
        let projection = Projection::new(&ProjectionConfig::default(), 80, 80);
        draw_geo_line(&mut canvas, &[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)], &projection);
        assert!(!canvas.is_blank());
    }
}
