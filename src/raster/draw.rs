//! Drawing primitives. Every plotted pixel goes through `blend_pixel`, so
//! translucent colors composite and off-grid coordinates are skipped.

use super::header::{BitDepth, Header};
use super::pixel_buffer::PixelBuffer;
use crate::color::Rgba;

impl PixelBuffer {
    /// Draw a line using Bresenham's algorithm.
    ///
    /// Steep lines are drawn transposed and endpoints are swapped so x always
    /// increases; both endpoints are plotted. Only the stretch of the major
    /// axis that lies on the grid is walked.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let (mut x0, mut y0, mut x1, mut y1) =
            (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));

        let steep = (x0 - x1).abs() < (y0 - y1).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let derror2 = (y1 - y0).abs() * 2;
        let ystep = if y1 > y0 { 1 } else { -1 };

        let limit = i64::from(if steep { self.height() } else { self.width() });
        let first = x0.max(0);
        let last = x1.min(limit - 1);
        if first > last {
            return;
        }

        // Jump the error term over the off-grid start: after k steps y has
        // moved ceil((k * derror2 - dx) / (2 * dx)) times.
        let skipped = i128::from(first - x0);
        let moves = if skipped == 0 {
            0
        } else {
            (skipped * i128::from(derror2) + i128::from(dx) - 1) / (2 * i128::from(dx))
        };
        let mut error2 = (skipped * i128::from(derror2) - 2 * i128::from(dx) * moves) as i64;
        let mut y = y0 + ystep * moves as i64;

        for x in first..=last {
            if steep {
                self.blend_pixel(y as i32, x as i32, color);
            } else {
                self.blend_pixel(x as i32, y as i32, color);
            }
            error2 += derror2;
            if error2 > dx {
                y += ystep;
                error2 -= dx * 2;
            }
        }
    }

    /// Outline of the rectangle spanning (x, y) to (x + w, y + h)
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let (x1, y1) = (x.saturating_add(w), y.saturating_add(h));
        self.draw_line(x, y, x1, y, color);
        self.draw_line(x1, y, x1, y1, color);
        self.draw_line(x, y1, x1, y1, color);
        self.draw_line(x, y, x, y1, color);
    }

    /// Filled `w` x `h` rectangle at (x, y), pasted from a solid brush
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u16, h: u16, color: Rgba) {
        let brush = Self::filled(Header::new(w, h, BitDepth::Rgba), color);
        self.paste(&brush, x, y);
    }

    /// Draw a circle outline (midpoint circle algorithm).
    ///
    /// The eight symmetric points of each step are deduplicated before
    /// plotting, so a translucent color is applied once per pixel. A radius
    /// of 0 plots the center; negative radii draw nothing.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        for (x, y) in circle_points(radius) {
            self.blend_pixel(cx.saturating_add(x), cy.saturating_add(y), color);
        }
    }

    /// Filled circle: the outline is drawn into a scratch brush, its center
    /// flood filled, and the brush pasted centered on (cx, cy).
    ///
    /// Nothing is drawn for a negative radius, for a circle that misses the
    /// buffer entirely, or when the brush side `2 * radius + 1` would not fit
    /// in a `u16`.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        if radius < 0 {
            return;
        }
        let Some(side) = radius
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .and_then(|s| u16::try_from(s).ok())
        else {
            return;
        };

        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        if cx + r < 0
            || cy + r < 0
            || cx - r >= i64::from(self.width())
            || cy - r >= i64::from(self.height())
        {
            return;
        }
        let (left, top) = ((cx - r) as i32, (cy - r) as i32);

        let mut brush = Self::with_size(side, side);
        brush.draw_circle(radius, radius, radius, color);
        brush.flood_fill(radius, radius, color, None);
        self.paste(&brush, left, top);
    }

    /// Replace the 4-connected region around (x, y) that has the `target`
    /// color (the seed's own color when `None`) with `fill`.
    ///
    /// Pixels on the outermost rows and columns are never written, and act
    /// as a wall. `fill` is stored verbatim. Returns the number of pixels
    /// written; filling with the target color itself writes nothing.
    pub fn flood_fill(&mut self, x: i32, y: i32, fill: Rgba, target: Option<Rgba>) -> usize {
        let target = target.unwrap_or_else(|| self.get_pixel(x, y));
        if fill == target {
            return 0;
        }

        let max_x = self.width() as i32 - 1;
        let max_y = self.height() as i32 - 1;
        let interior = |x: i32, y: i32| x > 0 && x < max_x && y > 0 && y < max_y;

        let mut written = 0;
        let mut pending = vec![(x, y)];
        while let Some((px, py)) = pending.pop() {
            if !interior(px, py) || self.get_pixel(px, py) != target {
                continue;
            }
            self.set_pixel(px, py, fill);
            written += 1;
            pending.extend_from_slice(&[(px + 1, py), (px - 1, py), (px, py + 1), (px, py - 1)]);
        }
        written
    }
}

/// Offsets of a midpoint circle of `radius` around the origin, sorted and
/// without duplicates
fn circle_points(radius: i32) -> Vec<(i32, i32)> {
    if radius < 0 {
        return Vec::new();
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 0;
    let mut points = Vec::with_capacity(8 * (radius as usize + 1));

    while x >= y {
        points.extend_from_slice(&[
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ]);

        if err <= 0 {
            y += 1;
            err += 2 * y + 1;
        }
        if err > 0 {
            x -= 1;
            err -= 2 * x + 1;
        }
    }

    points.sort_unstable();
    points.dedup();
    points
}
