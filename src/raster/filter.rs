//! Whole-buffer filters: 3x3 box blur and the grayscale contrast/posterize
//! remaps.

use super::pixel_buffer::PixelBuffer;
use crate::color::Rgba;
use crate::util::map;

impl PixelBuffer {
    /// 3x3 box blur over all four channels, edges clamped.
    ///
    /// The center pixel counts `sharpness` times, so the divisor is
    /// `8 + sharpness`: 1 gives a plain box blur, larger values keep more of
    /// the original. Neighbors are read from a snapshot taken before the pass.
    pub fn blur(&mut self, sharpness: u32) {
        let cols = self.width() as i32;
        let rows = self.height() as i32;
        if cols == 0 || rows == 0 {
            return;
        }

        let source = self.pixels().to_vec();
        let sharpness = u64::from(sharpness);
        let divisor = 8 + sharpness;

        for y in 0..rows {
            for x in 0..cols {
                let mut total = [0u64; 4];
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let nx = (x + dx).clamp(0, cols - 1);
                        let ny = (y + dy).clamp(0, rows - 1);
                        let c = source[(ny * cols + nx) as usize];
                        let weight = if dx == 0 && dy == 0 { sharpness } else { 1 };
                        total[0] += u64::from(c.r) * weight;
                        total[1] += u64::from(c.g) * weight;
                        total[2] += u64::from(c.b) * weight;
                        total[3] += u64::from(c.a) * weight;
                    }
                }
                let avg = |t: u64| (t / divisor).min(255) as u8;
                self.set_pixel(
                    x,
                    y,
                    Rgba::new(avg(total[0]), avg(total[1]), avg(total[2]), avg(total[3])),
                );
            }
        }
    }

    /// Linear contrast stretch of a grayscale buffer.
    ///
    /// The red channel stands in for the gray level: values at or below
    /// `low` become 0, at or above `high` become 255, and the range between
    /// is remapped linearly. With `low >= high` this is a hard threshold at
    /// `low`. Alpha is kept.
    pub fn contrast(&mut self, low: u8, high: u8) {
        for pixel in self.pixels_mut() {
            let v = pixel.r;
            let out = if v <= low {
                0
            } else if v >= high {
                255
            } else {
                map(v as f64, low as f64, high as f64, 0.0, 255.0).round() as u8
            };
            *pixel = Rgba::gray(out, pixel.a);
        }
    }

    /// Reduce a grayscale buffer to `levels` evenly spaced gray values
    /// spanning 0..=255. The red channel stands in for the gray level; fewer
    /// than 2 levels is treated as 2. Alpha is kept.
    pub fn posterize(&mut self, levels: u8) {
        let levels = levels.max(2) as u32;
        let top = (levels - 1) as f64;
        for pixel in self.pixels_mut() {
            let step = (pixel.r as u32 * levels / 256) as f64;
            let out = map(step, 0.0, top, 0.0, 255.0).round() as u8;
            *pixel = Rgba::gray(out, pixel.a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BitDepth;

    #[test]
    fn test_blur_uniform_is_stable() {
        let mut pb = PixelBuffer::new(5, 5, BitDepth::Rgba, Rgba::new(90, 90, 90, 255)).unwrap();
        pb.blur(1);
        assert!(pb.pixels().iter().all(|&p| p == Rgba::new(90, 90, 90, 255)));
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut pb = PixelBuffer::new(5, 5, BitDepth::Rgba, Rgba::BLACK).unwrap();
        pb.set_pixel(2, 2, Rgba::gray(90, 255));
        pb.blur(1);
        assert_eq!(pb.get_pixel(2, 2), Rgba::gray(10, 255));
        assert_eq!(pb.get_pixel(1, 1), Rgba::gray(10, 255));
        assert_eq!(pb.get_pixel(3, 2), Rgba::gray(10, 255));
        assert_eq!(pb.get_pixel(0, 0), Rgba::BLACK);
    }

    #[test]
    fn test_blur_sharpness_weights_center() {
        let mut pb = PixelBuffer::new(5, 5, BitDepth::Rgba, Rgba::BLACK).unwrap();
        pb.set_pixel(2, 2, Rgba::gray(100, 255));
        pb.blur(12);
        // 100 * 12 / 20
        assert_eq!(pb.get_pixel(2, 2), Rgba::gray(60, 255));
        // 100 / 20
        assert_eq!(pb.get_pixel(2, 1), Rgba::gray(5, 255));
    }

    #[test]
    fn test_blur_huge_sharpness() {
        let mut pb = PixelBuffer::new(2, 2, BitDepth::Rgba, Rgba::WHITE).unwrap();
        pb.blur(u32::MAX);
        assert!(pb.pixels().iter().all(|&p| p == Rgba::WHITE));

        let mut pb = PixelBuffer::new(3, 3, BitDepth::Rgba, Rgba::BLACK).unwrap();
        pb.set_pixel(1, 1, Rgba::WHITE);
        pb.blur(20_000_000);
        // 255 * s / (s + 8) rounds down to 254
        assert_eq!(pb.get_pixel(1, 1), Rgba::new(254, 254, 254, 255));
        assert_eq!(pb.get_pixel(0, 0), Rgba::BLACK);
        assert_eq!(pb.get_pixel(2, 1), Rgba::BLACK);
    }

    #[test]
    fn test_blur_clamps_edges() {
        let mut pb = PixelBuffer::new(3, 3, BitDepth::Rgba, Rgba::BLACK).unwrap();
        pb.set_pixel(0, 0, Rgba::gray(90, 255));
        pb.blur(1);
        // corner is sampled 4 times at the clamped corner: 4 * 90 / 9
        assert_eq!(pb.get_pixel(0, 0), Rgba::gray(40, 255));
    }

    #[test]
    fn test_blur_empty_buffer() {
        let mut pb = PixelBuffer::with_size(0, 0);
        pb.blur(1);
        assert!(pb.pixels().is_empty());
    }

    #[test]
    fn test_contrast_stretch() {
        let mut pb = PixelBuffer::with_size(4, 1);
        pb.set_pixel(0, 0, Rgba::gray(50, 255));
        pb.set_pixel(1, 0, Rgba::gray(100, 255));
        pb.set_pixel(2, 0, Rgba::gray(150, 200));
        pb.set_pixel(3, 0, Rgba::gray(220, 255));
        pb.contrast(50, 150);
        assert_eq!(pb.get_pixel(0, 0), Rgba::gray(0, 255));
        assert_eq!(pb.get_pixel(1, 0), Rgba::gray(128, 255));
        assert_eq!(pb.get_pixel(2, 0), Rgba::gray(255, 200));
        assert_eq!(pb.get_pixel(3, 0), Rgba::gray(255, 255));
    }

    #[test]
    fn test_contrast_threshold_when_range_empty() {
        let mut pb = PixelBuffer::with_size(2, 1);
        pb.set_pixel(0, 0, Rgba::gray(100, 255));
        pb.set_pixel(1, 0, Rgba::gray(101, 255));
        pb.contrast(100, 100);
        assert_eq!(pb.get_pixel(0, 0), Rgba::gray(0, 255));
        assert_eq!(pb.get_pixel(1, 0), Rgba::gray(255, 255));
    }

    #[test]
    fn test_posterize_levels() {
        let mut pb = PixelBuffer::with_size(5, 1);
        for (x, v) in [0u8, 63, 64, 150, 255].into_iter().enumerate() {
            pb.set_pixel(x as i32, 0, Rgba::gray(v, 255));
        }
        pb.posterize(4);
        let out: Vec<u8> = pb.pixels().iter().map(|p| p.r).collect();
        assert_eq!(out, vec![0, 0, 85, 170, 255]);
        assert!(pb.pixels().iter().all(|p| p.r == p.g && p.g == p.b));
    }

    #[test]
    fn test_posterize_minimum_two_levels() {
        let mut pb = PixelBuffer::with_size(2, 1);
        pb.set_pixel(0, 0, Rgba::gray(127, 255));
        pb.set_pixel(1, 0, Rgba::gray(128, 255));
        pb.posterize(0);
        assert_eq!(pb.get_pixel(0, 0).r, 0);
        assert_eq!(pb.get_pixel(1, 0).r, 255);
    }
}
