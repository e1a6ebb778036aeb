//! RGBA / HSVA color values and the small set of color helpers the raster
//! algorithms lean on (alpha compositing, hue rotation, grayscale).

use serde::{Deserialize, Serialize};

// ============================================================================
// Rgba
// ============================================================================

/// A 32 bit color, one byte per channel.
///
/// `Default` is fully transparent black, the fill used for fresh buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const GRAY: Self = Self::new(127, 127, 127, 255);
    pub const RED: Self = Self::new(255, 0, 0, 255);
    pub const ORANGE: Self = Self::new(255, 127, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255, 255);
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255, 255);
    pub const PURPLE: Self = Self::new(127, 0, 127, 255);
    pub const PINK: Self = Self::new(255, 127, 255, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three channels
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Gray color with r = g = b = `value`
    #[inline]
    pub const fn gray(value: u8, a: u8) -> Self {
        Self::new(value, value, value, a)
    }

    /// Unpack from 0xRRGGBBAA
    pub const fn from_int(color: u32) -> Self {
        Self::new(
            (color >> 24) as u8,
            (color >> 16) as u8,
            (color >> 8) as u8,
            color as u8,
        )
    }

    /// Pack as 0xRRGGBBAA
    pub const fn as_int(&self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Look up one of the named constants (case insensitive)
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "gray" | "grey" => Self::GRAY,
            "red" => Self::RED,
            "orange" => Self::ORANGE,
            "yellow" => Self::YELLOW,
            "green" => Self::GREEN,
            "cyan" => Self::CYAN,
            "blue" => Self::BLUE,
            "magenta" => Self::MAGENTA,
            "purple" => Self::PURPLE,
            "pink" => Self::PINK,
            "white" => Self::WHITE,
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    /// 1-bit classification: anything but pure black (ignoring alpha) is "on"
    #[inline]
    pub const fn is_on(&self) -> bool {
        (self.r | self.g | self.b) != 0
    }

    /// Integer channel average, (r + g + b) / 3
    #[inline]
    pub const fn gray_level(&self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }
}

// ============================================================================
// Hsva
// ============================================================================

/// Hue, saturation, value and alpha, each in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsva {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

impl Hsva {
    pub const fn new(h: f32, s: f32, v: f32, a: f32) -> Self {
        Self { h, s, v, a }
    }
}

impl Default for Hsva {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl From<Rgba> for Hsva {
    fn from(rgba: Rgba) -> Self {
        let r = rgba.r as f32 / 255.0;
        let g = rgba.g as f32 / 255.0;
        let b = rgba.b as f32 / 255.0;
        let a = rgba.a as f32 / 255.0;

        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        let delta = max - min;

        // Gray: no chroma
        if delta == 0.0 {
            return Self::new(0.0, 0.0, max, a);
        }

        let s = delta / max;
        let dr = ((max - r) / 6.0 + delta / 2.0) / delta;
        let dg = ((max - g) / 6.0 + delta / 2.0) / delta;
        let db = ((max - b) / 6.0 + delta / 2.0) / delta;

        let mut h = if r == max {
            db - dg
        } else if g == max {
            1.0 / 3.0 + dr - db
        } else {
            2.0 / 3.0 + dg - dr
        };
        if h < 0.0 {
            h += 1.0;
        }
        if h > 1.0 {
            h -= 1.0;
        }

        Self::new(h, s, max, a)
    }
}

impl From<Hsva> for Rgba {
    fn from(hsva: Hsva) -> Self {
        // float -> u8 casts saturate, out-of-range components clamp to 0/255
        let to_byte = |v: f32| (v * 255.0) as u8;
        let a = to_byte(hsva.a);

        if hsva.s == 0.0 {
            let v = to_byte(hsva.v);
            return Self::new(v, v, v, a);
        }

        let mut h = hsva.h * 6.0;
        if h >= 6.0 {
            h = 0.0;
        }
        let sector = h as i32;
        let frac = h - sector as f32;
        let v = hsva.v;
        let p = v * (1.0 - hsva.s);
        let q = v * (1.0 - hsva.s * frac);
        let t = v * (1.0 - hsva.s * (1.0 - frac));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self::new(to_byte(r), to_byte(g), to_byte(b), a)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Composite `top` over `bottom` ("over" operator).
///
/// An opaque `top` is returned as is, a fully transparent `top` yields
/// `bottom`. In between the combined alpha is at least `top.a`, so the
/// division below never sees zero.
pub fn alpha_blend(top: Rgba, bottom: Rgba) -> Rgba {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }

    let a0 = top.a as f32 / 255.0;
    let a1 = bottom.a as f32 / 255.0;
    let a01 = (1.0 - a0) * a1 + a0;

    let channel = |c0: u8, c1: u8| {
        let c0 = c0 as f32 / 255.0;
        let c1 = c1 as f32 / 255.0;
        let c = ((1.0 - a0) * a1 * c1 + a0 * c0) / a01;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba::new(
        channel(top.r, bottom.r),
        channel(top.g, bottom.g),
        channel(top.b, bottom.b),
        (a01 * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Rotate the hue by `step` (a fraction of the color wheel)
pub fn rotate(rgba: Rgba, step: f32) -> Rgba {
    let mut hsva = Hsva::from(rgba);
    hsva.h = (hsva.h + step).rem_euclid(1.0);
    Rgba::from(hsva)
}

/// Snap each channel to the closest of `factor + 1` evenly spaced levels.
/// A factor of 1 gives pure black/white per channel; 0 is treated as 1.
pub fn quantize(rgba: Rgba, factor: u8) -> Rgba {
    let factor = factor.max(1) as f32;
    let snap = |c: u8| ((factor * c as f32 / 255.0).round() * (255.0 / factor)) as u8;
    Rgba::new(snap(rgba.r), snap(rgba.g), snap(rgba.b), rgba.a)
}

pub fn negative(rgba: Rgba) -> Rgba {
    Rgba::new(255 - rgba.r, 255 - rgba.g, 255 - rgba.b, rgba.a)
}

/// Average grayscale, (r + g + b) / 3
pub fn average(rgba: Rgba) -> Rgba {
    Rgba::gray(rgba.gray_level(), rgba.a)
}

/// Weighted luminance grayscale, 0.3r + 0.59g + 0.11b
pub fn luminance(rgba: Rgba) -> Rgba {
    let lum = rgba.r as f32 * 0.3 + rgba.g as f32 * 0.59 + rgba.b as f32 * 0.11;
    Rgba::gray(lum as u8, rgba.a)
}
