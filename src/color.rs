use rand::Rng;
use std::ops::RangeInclusive;

pub const CHANNEL_MAX: u8 = 31;

/// A 15-bit CGRAM color word, stored little-endian as `0BBBBBGG GGGRRRRR`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Color15 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color15 {
    /// Channels above 31 are clamped.
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r.min(CHANNEL_MAX),
            g: g.min(CHANNEL_MAX),
            b: b.min(CHANNEL_MAX),
        }
    }
    /// Bit 15 of the word is unused by the hardware and is dropped.
    #[inline]
    pub fn unpack(high: u8, low: u8) -> Self {
        let r = low & 0x1f;
        let g = ((high & 0x03) << 3) | (low >> 5);
        let b = (high >> 2) & 0x1f;
        Self { r, g, b }
    }
    #[inline]
    pub fn pack(&self) -> (u8, u8) {
        let low = (self.r & 0x1f) | ((self.g & 0x07) << 5);
        let high = ((self.g >> 3) & 0x03) | ((self.b & 0x1f) << 2);
        (high, low)
    }
    /// Reads the word at the start of `data` (low byte first).
    #[inline]
    pub fn read(data: &[u8]) -> Self {
        Self::unpack(data[1], data[0])
    }
    #[inline]
    pub fn write(&self, out: &mut [u8]) {
        let (high, low) = self.pack();
        out[0] = low;
        out[1] = high;
    }
    fn to_hsv(self) -> (f64, f64, f64) {
        let max = CHANNEL_MAX as f64;
        rgb_to_hsv(self.r as f64 / max, self.g as f64 / max, self.b as f64 / max)
    }
    fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = hsv_to_rgb(h, s, v);
        Self::new(from_unit(r), from_unit(g), from_unit(b))
    }
}

/// Scales a `[0, 1]` channel to `[0, 31]`, truncating toward zero.
#[inline]
fn from_unit(c: f64) -> u8 {
    (c * CHANNEL_MAX as f64) as u8
}

pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;
    if minc == maxc {
        return (0.0, 0.0, v);
    }
    let range = maxc - minc;
    let s = range / maxc;
    let rc = (maxc - r) / range;
    let gc = (maxc - g) / range;
    let bc = (maxc - b) / range;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).trunc();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Draws a color with a uniform hue in `[0, 1)` and saturation/value
/// uniform in the given ranges.
pub fn random_color(
    rng: &mut impl Rng,
    saturation: RangeInclusive<f64>,
    value: RangeInclusive<f64>,
) -> Color15 {
    let h = rng.gen::<f64>();
    let s = rng.gen_range(saturation);
    let v = rng.gen_range(value);
    Color15::from_hsv(h, s, v)
}

/// Rotates the hue of `color` by `angle` degrees. The hue wraps once, so
/// `angle` must lie in `(0, 720)`.
pub fn complementary_color(color: Color15, angle: f64) -> Color15 {
    let (h, s, v) = color.to_hsv();
    let mut h = h + angle / 360.0;
    if h >= 1.0 {
        h -= 1.0;
    }
    Color15::from_hsv(h, s, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn pack_unpack_all_channels() {
        for r in 0..=CHANNEL_MAX {
            for g in 0..=CHANNEL_MAX {
                for b in 0..=CHANNEL_MAX {
                    let c = Color15::new(r, g, b);
                    let (high, low) = c.pack();
                    assert_eq!(Color15::unpack(high, low), c);
                }
            }
        }
    }

    #[test]
    fn unpack_pack_all_words() {
        for word in 0u16..0x8000 {
            let [low, high] = word.to_le_bytes();
            assert_eq!(Color15::unpack(high, low).pack(), (high, low));
        }
    }

    #[test]
    fn unused_bit_is_dropped() {
        assert_eq!(Color15::unpack(0xff, 0xff).pack(), (0x7f, 0xff));
    }

    #[test]
    fn bit_layout() {
        // pure red, green and blue
        assert_eq!(Color15::new(31, 0, 0).pack(), (0x00, 0x1f));
        assert_eq!(Color15::new(0, 31, 0).pack(), (0x03, 0xe0));
        assert_eq!(Color15::new(0, 0, 31).pack(), (0x7c, 0x00));
        let mut buf = [0u8; 2];
        Color15::new(1, 2, 3).write(&mut buf);
        assert_eq!(buf, [0x41, 0x0c]);
        assert_eq!(Color15::read(&buf), Color15::new(1, 2, 3));
    }

    #[test]
    fn new_clamps() {
        assert_eq!(Color15::new(40, 32, 255), Color15::new(31, 31, 31));
    }

    #[test]
    fn hsv_round_trip() {
        for (r, g, b) in [(1.0, 0.0, 0.0), (0.2, 0.6, 0.4), (0.9, 0.9, 0.1), (0.5, 0.5, 0.5)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-9);
            assert!((g - g2).abs() < 1e-9);
            assert!((b - b2).abs() < 1e-9);
        }
    }

    #[test]
    fn random_color_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = random_color(&mut rng, 0.5..=0.9, 0.45..=0.9);
            let max = c.r.max(c.g).max(c.b);
            // value <= 0.9 truncates to at most 27
            assert!(max <= 27, "{c:?}");
            assert!(max >= 13, "{c:?}");
        }
    }

    #[test]
    fn complementary_rotates_hue() {
        let red = Color15::new(31, 0, 0);
        assert_eq!(complementary_color(red, 120.0), Color15::new(0, 31, 0));
        assert_eq!(complementary_color(red, 240.0), Color15::new(0, 0, 31));
        // wraps past a full turn
        let blue = Color15::new(0, 0, 31);
        assert_eq!(complementary_color(blue, 120.0), Color15::new(31, 0, 0));
    }

    #[test]
    fn complementary_keeps_grey() {
        let grey = Color15::new(12, 12, 12);
        assert_eq!(complementary_color(grey, 90.0), grey);
    }
}
