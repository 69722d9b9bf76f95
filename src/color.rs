//! Small color helpers shared by the sky and the renderer.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32, // 0..1, wraps
    pub s: f32, // 0..1
    pub l: f32, // 0..1
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

/// Convert HSL to RGB. Saturation and lightness are clamped to [0, 1].
pub fn hsl_to_rgb(hsl: Hsl) -> [f32; 3] {
    let h = hsl.h.rem_euclid(1.0);
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Unpack a `0xRRGGBB` literal into normalized RGB
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(hsl_to_rgb(Hsl::new(0.0, 1.0, 0.5)), [1.0, 0.0, 0.0]));
        assert!(close(hsl_to_rgb(Hsl::new(1.0 / 3.0, 1.0, 0.5)), [0.0, 1.0, 0.0]));
        assert!(close(hsl_to_rgb(Hsl::new(2.0 / 3.0, 1.0, 0.5)), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_lightness_is_clamped() {
        assert!(close(hsl_to_rgb(Hsl::new(0.6, 0.8, 1.4)), [1.0, 1.0, 1.0]));
        assert!(close(hsl_to_rgb(Hsl::new(0.6, 0.8, -0.2)), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_grey_without_saturation() {
        assert!(close(hsl_to_rgb(Hsl::new(0.3, 0.0, 0.25)), [0.25, 0.25, 0.25]));
    }

    #[test]
    fn test_hex_unpacking() {
        assert!(close(rgb_from_hex(0xff8000), [1.0, 128.0 / 255.0, 0.0]));
        assert!(close(rgb_from_hex(0xaaaaaa), [170.0 / 255.0; 3]));
    }
}
