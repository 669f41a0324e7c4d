//! Pixel-level adjustments on RGBA8 buffers.
//!
//! All functions are pure: same buffer and parameters, same output.

use image::{Rgba, RgbaImage};

/// Rec. 601 luma of an RGB triple.
fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale brightness, then push each channel away from (or toward) its luma.
///
/// `brightness` and `saturation` are multipliers; 1.0 leaves the image unchanged.
pub fn modulate(image: &mut RgbaImage, brightness: f32, saturation: f32) {
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let (r, g, b) = (
            r as f32 * brightness,
            g as f32 * brightness,
            b as f32 * brightness,
        );
        let gray = luma(r, g, b);
        *pixel = Rgba([
            clamp_u8(gray + (r - gray) * saturation),
            clamp_u8(gray + (g - gray) * saturation),
            clamp_u8(gray + (b - gray) * saturation),
            a,
        ]);
    }
}

/// Multiply each channel by the tint color's channel fraction.
pub fn tint(image: &mut RgbaImage, color: [u8; 3]) {
    let factors = color.map(|c| c as f32 / 255.0);
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([
            clamp_u8(r as f32 * factors[0]),
            clamp_u8(g as f32 * factors[1]),
            clamp_u8(b as f32 * factors[2]),
            a,
        ]);
    }
}

/// Stretch the luma histogram so its 1st..99th percentile spans 0..255.
///
/// Flat images (a single luma level) are left untouched.
pub fn normalize(image: &mut RgbaImage) {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        let Rgba([r, g, b, _]) = *pixel;
        histogram[clamp_u8(luma(r as f32, g as f32, b as f32)) as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return;
    }
    let cutoff = total / 100;
    let low = percentile_index(histogram.iter(), cutoff);
    let high = 255 - percentile_index(histogram.iter().rev(), cutoff);
    if high <= low {
        return;
    }

    let low = low as f32;
    let scale = 255.0 / (high as f32 - low);
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([
            clamp_u8((r as f32 - low) * scale),
            clamp_u8((g as f32 - low) * scale),
            clamp_u8((b as f32 - low) * scale),
            a,
        ]);
    }
}

/// First bucket at which the running count exceeds `cutoff`.
fn percentile_index<'a>(buckets: impl Iterator<Item = &'a u64>, cutoff: u64) -> usize {
    let mut seen = 0u64;
    for (i, count) in buckets.enumerate() {
        seen += count;
        if seen > cutoff {
            return i;
        }
    }
    0
}

/// Composite over an opaque white background.
pub fn flatten_on_white(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| clamp_u8(c as f32 * alpha + 255.0 * (1.0 - alpha));
        *pixel = Rgba([blend(r), blend(g), blend(b), 255]);
    }
}
