//! HSV-to-RGB conversion

fn clamp(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }

    if v < 0.0 {
        return 0;
    }

    if v > 255.0 {
        return 255;
    }

    v.round() as u8
}

/// Convert a hue/saturation/value color into 8-bit RGB.
///
/// Hue is in degrees and wraps around, so 360 is the same as 0. Saturation
/// and value are clamped to `[0, 1]`. The conversion splits the hue circle
/// into six 60 degree sectors and interpolates linearly within each; a NaN
/// hue yields black.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    if hue.is_nan() {
        return [0, 0, 0];
    }

    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);

    let h = hue.rem_euclid(360.0);
    let h = if h >= 360.0 { 0.0 } else { h / 60.0 };
    let sector = h.floor();
    let fr = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * fr);
    let t = v * (1.0 - s * (1.0 - fr));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [clamp(r * 255.0), clamp(g * 255.0), clamp(b * 255.0)]
}
