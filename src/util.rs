//! Shared utilities

/// Low byte of a 16 bit word
#[inline]
pub const fn low_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

/// High byte of a 16 bit word
#[inline]
pub const fn high_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

/// Build a word from its high and low byte
#[inline]
pub const fn make_word(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Linearly map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// `map(973.0, 0.0, 1023.0, 0.0, 255.0)` is ~242.5. An empty input range
/// maps everything to `out_min`.
#[inline]
pub fn map(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn constrain(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Row-major index of (x, y) in a grid `cols` wide
#[inline]
pub const fn index(x: usize, y: usize, cols: usize) -> usize {
    y * cols + x
}

/// `prefix` + zero padded `counter` + `.pbf`
///
/// The counter is padded to `leading_zeros + 1` digits, so the default of 4
/// yields `frame00042.pbf`.
pub fn create_filename(prefix: &str, counter: u32, leading_zeros: u8) -> String {
    let width = leading_zeros as usize + 1;
    format!("{prefix}{counter:0width$}.pbf")
}
