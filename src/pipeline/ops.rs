// SPDX-License-Identifier: GPL-3.0-only

//! CPU implementations of the filter operations
//!
//! All operations work on 8-bit RGBA buffers with per-pixel math in f32
//! [0, 1], quantizing back once per op. Every function is deterministic:
//! identical input bytes produce identical output bytes.

use image::{Rgba, RgbaImage, imageops};

/// Rec. 601 luma weights used by every luminance-based op.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Posterization level count.
const POSTERIZE_LEVELS: f32 = 6.0;

/// Luminance sharpen amount.
const SHARPEN_AMOUNT: f32 = 0.4;

/// Unsharp mask intensity.
const UNSHARP_INTENSITY: f32 = 0.5;

#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

#[inline]
fn to_f32(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_u8(v: f32) -> u8 {
    // Round to nearest so a mathematically-identity op is also a byte
    // identity; truncation would shift values by one count.
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map every pixel's RGB through `f`, preserving alpha.
fn map_rgb(image: &RgbaImage, f: impl Fn(f32, f32, f32) -> (f32, f32, f32)) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let (r, g, b) = f(to_f32(pixel[0]), to_f32(pixel[1]), to_f32(pixel[2]));
        pixel[0] = to_u8(r);
        pixel[1] = to_u8(g);
        pixel[2] = to_u8(b);
    }
    out
}

/// Sample a channel with coordinates clamped to the image bounds.
#[inline]
fn sample(image: &RgbaImage, x: i64, y: i64, channel: usize) -> f32 {
    let x = x.clamp(0, image.width() as i64 - 1) as u32;
    let y = y.clamp(0, image.height() as i64 - 1) as u32;
    to_f32(image.get_pixel(x, y)[channel])
}

/// Luminance at clamped coordinates.
#[inline]
fn sample_luma(image: &RgbaImage, x: i64, y: i64) -> f32 {
    let x = x.clamp(0, image.width() as i64 - 1) as u32;
    let y = y.clamp(0, image.height() as i64 - 1) as u32;
    let p = image.get_pixel(x, y);
    luma(to_f32(p[0]), to_f32(p[1]), to_f32(p[2]))
}

// ============================================================
// Toggle filters
// ============================================================

pub fn color_invert(image: &RgbaImage) -> RgbaImage {
    map_rgb(image, |r, g, b| (1.0 - r, 1.0 - g, 1.0 - b))
}

pub fn posterize(image: &RgbaImage) -> RgbaImage {
    map_rgb(image, |r, g, b| {
        (
            (r * POSTERIZE_LEVELS).floor() / POSTERIZE_LEVELS,
            (g * POSTERIZE_LEVELS).floor() / POSTERIZE_LEVELS,
            (b * POSTERIZE_LEVELS).floor() / POSTERIZE_LEVELS,
        )
    })
}

/// Sharpen the luminance channel only: a Laplacian delta on luma is added to
/// all three channels, leaving chroma relationships intact.
pub fn sharpen_luminance(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let x = x as i64;
        let y = y as i64;
        let center = sample_luma(image, x, y);
        let lap = 4.0 * center
            - sample_luma(image, x - 1, y)
            - sample_luma(image, x + 1, y)
            - sample_luma(image, x, y - 1)
            - sample_luma(image, x, y + 1);
        let delta = SHARPEN_AMOUNT * lap;

        for c in 0..3 {
            pixel[c] = to_u8(to_f32(pixel[c]) + delta);
        }
    }
    out
}

/// Unsharp mask: original plus a weighted difference against a 3x3 box blur,
/// per channel.
pub fn unsharp_mask(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let x = x as i64;
        let y = y as i64;
        for c in 0..3 {
            let mut blur = 0.0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    blur += sample(image, x + dx, y + dy, c);
                }
            }
            blur /= 9.0;
            let original = to_f32(pixel[c]);
            pixel[c] = to_u8(original + UNSHARP_INTENSITY * (original - blur));
        }
    }
    out
}

/// Per-channel Sobel gradient magnitude.
pub fn edges(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let x = x as i64;
        let y = y as i64;
        for c in 0..3 {
            let (gx, gy) = sobel(image, x, y, |img, sx, sy| sample(img, sx, sy, c));
            pixel[c] = to_u8((gx * gx + gy * gy).sqrt());
        }
    }
    out
}

/// Gradient vector field: horizontal and vertical luminance gradients encoded
/// around mid-gray in the red and green channels.
pub fn gabor_gradients(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let (gx, gy) = sobel(image, x as i64, y as i64, sample_luma);
        pixel[0] = to_u8(0.5 + gx * 0.5);
        pixel[1] = to_u8(0.5 + gy * 0.5);
        pixel[2] = to_u8(0.5);
    }
    out
}

#[inline]
fn sobel(
    image: &RgbaImage,
    x: i64,
    y: i64,
    s: impl Fn(&RgbaImage, i64, i64) -> f32,
) -> (f32, f32) {
    let tl = s(image, x - 1, y - 1);
    let tm = s(image, x, y - 1);
    let tr = s(image, x + 1, y - 1);
    let ml = s(image, x - 1, y);
    let mr = s(image, x + 1, y);
    let bl = s(image, x - 1, y + 1);
    let bm = s(image, x, y + 1);
    let br = s(image, x + 1, y + 1);

    let gx = -tl - 2.0 * ml - bl + tr + 2.0 * mr + br;
    let gy = -tl - 2.0 * tm - tr + bl + 2.0 * bm + br;
    (gx, gy)
}

/// Clamp every channel into the displayable range. On 8-bit buffers values
/// are already in range; the op exists so float backends stay interchangeable.
pub fn color_clamp(image: &RgbaImage) -> RgbaImage {
    map_rgb(image, |r, g, b| {
        (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    })
}

/// 3x3 convolution with a sharpening kernel:
/// [ 0, -1, 0 ], [ -1, 5, -1 ], [ 0, -1, 0 ]
pub fn convolution_3x3(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let x = x as i64;
        let y = y as i64;
        for c in 0..3 {
            let value = 5.0 * sample(image, x, y, c)
                - sample(image, x - 1, y, c)
                - sample(image, x + 1, y, c)
                - sample(image, x, y - 1, c)
                - sample(image, x, y + 1, c);
            pixel[c] = to_u8(value);
        }
    }
    out
}

// ============================================================
// Continuous tone adjustments
// ============================================================

/// Brightness, contrast, and saturation in one pass, applied in that order.
pub fn color_controls(
    image: &RgbaImage,
    brightness: f32,
    contrast: f32,
    saturation: f32,
) -> RgbaImage {
    map_rgb(image, |r, g, b| {
        let r = r + brightness;
        let g = g + brightness;
        let b = b + brightness;

        let r = (r - 0.5) * contrast + 0.5;
        let g = (g - 0.5) * contrast + 0.5;
        let b = (b - 0.5) * contrast + 0.5;

        let gray = luma(r, g, b);
        (
            gray + (r - gray) * saturation,
            gray + (g - gray) * saturation,
            gray + (b - gray) * saturation,
        )
    })
}

pub fn gamma_adjust(image: &RgbaImage, power: f32) -> RgbaImage {
    map_rgb(image, |r, g, b| {
        (
            r.clamp(0.0, 1.0).powf(power),
            g.clamp(0.0, 1.0).powf(power),
            b.clamp(0.0, 1.0).powf(power),
        )
    })
}

/// Rotate chroma in the YIQ plane by `angle` radians; luminance is preserved.
pub fn hue_adjust(image: &RgbaImage, angle: f32) -> RgbaImage {
    let (sin, cos) = angle.sin_cos();
    map_rgb(image, |r, g, b| {
        let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        let i = 0.596 * r - 0.274 * g - 0.322 * b;
        let q = 0.211 * r - 0.523 * g + 0.312 * b;

        let ri = i * cos - q * sin;
        let rq = i * sin + q * cos;

        (
            y + 0.956 * ri + 0.621 * rq,
            y - 0.272 * ri - 0.647 * rq,
            y - 1.106 * ri + 1.703 * rq,
        )
    })
}

/// Compress highlights and lift shadows weighted by luminance region.
/// `highlight` 1.0 and `shadow` 0.0 are the identity.
pub fn highlight_shadow(image: &RgbaImage, highlight: f32, shadow: f32) -> RgbaImage {
    map_rgb(image, |r, g, b| {
        let l = luma(r, g, b);
        let highlight_weight = smoothstep(0.5, 1.0, l);
        let shadow_weight = 1.0 - smoothstep(0.0, 0.5, l);

        let gain = 1.0 - (1.0 - highlight) * highlight_weight;
        let lift = shadow * 0.5 * shadow_weight;

        (r * gain + lift, g * gain + lift, b * gain + lift)
    })
}

/// Per-channel gains moving the neutral point from `temperature`/`tint`
/// toward the 6500 K reference. Gains are expressed relative to 6500 K so the
/// neutral preset is the exact identity.
pub fn temperature_tint(image: &RgbaImage, temperature: f32, tint: f32) -> RgbaImage {
    let target = kelvin_multipliers(temperature);
    let reference = kelvin_multipliers(6500.0);
    let mut gains = [
        target[0] / reference[0],
        target[1] / reference[1],
        target[2] / reference[2],
    ];

    // Tint moves the green-magenta axis, ±200 maps to ±50% green gain.
    gains[1] *= 1.0 + tint / 400.0;

    map_rgb(image, |r, g, b| (r * gains[0], g * gains[1], b * gains[2]))
}

/// Kelvin to RGB multipliers, Tanner Helland's approximation of the
/// Planckian locus, normalized to the green channel.
fn kelvin_multipliers(kelvin: f32) -> [f32; 3] {
    let temp = (kelvin / 100.0).clamp(10.0, 400.0);

    let (r, g, b) = if temp <= 66.0 {
        let r = 255.0;
        let g = 99.470_8 * temp.ln() - 161.119_57;
        let b = if temp <= 19.0 {
            0.0
        } else {
            138.517_73 * (temp - 10.0).ln() - 305.044_8
        };
        (r, g.clamp(0.0, 255.0), b.clamp(0.0, 255.0))
    } else {
        let r = 329.698_73 * (temp - 60.0).powf(-0.133_204_76);
        let g = 288.122_16 * (temp - 60.0).powf(-0.075_514_85);
        let b = 255.0;
        (r.clamp(0.0, 255.0), g.clamp(0.0, 255.0), b)
    };

    let g_ref = (g / 255.0).max(0.001);
    [
        g_ref / (r / 255.0).max(0.001),
        1.0,
        g_ref / (b / 255.0).max(0.001),
    ]
}

pub fn white_point(image: &RgbaImage, white: f32) -> RgbaImage {
    map_rgb(image, |r, g, b| (r * white, g * white, b * white))
}

// ============================================================
// Geometry
// ============================================================

/// Rotate by `degrees` counter-clockwise into the rotated bounding box.
///
/// Right angles use exact pixel rotations; arbitrary angles sample the source
/// bilinearly and fill the uncovered corners with transparent black, so the
/// output extent grows. Use [`crop_centered`] to clamp back to a fixed size.
pub fn rotate(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let degrees = degrees.rem_euclid(360.0);
    if degrees == 0.0 {
        return image.clone();
    }
    if degrees == 90.0 {
        return imageops::rotate270(image);
    }
    if degrees == 180.0 {
        return imageops::rotate180(image);
    }
    if degrees == 270.0 {
        return imageops::rotate90(image);
    }

    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    let (w, h) = (image.width() as f32, image.height() as f32);
    let out_w = (w * cos.abs() + h * sin.abs()).ceil() as u32;
    let out_h = (w * sin.abs() + h * cos.abs()).ceil() as u32;

    let cx = w / 2.0;
    let cy = h / 2.0;
    let ocx = out_w as f32 / 2.0;
    let ocy = out_h as f32 / 2.0;

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        // Inverse mapping: rotate the output coordinate back into the source.
        // The sign convention matches the right-angle fast paths (visual
        // counter-clockwise with y growing downward).
        let dx = x as f32 + 0.5 - ocx;
        let dy = y as f32 + 0.5 - ocy;
        let sx = dx * cos - dy * sin + cx - 0.5;
        let sy = dx * sin + dy * cos + cy - 0.5;

        *pixel = bilinear(image, sx, sy);
    }
    out
}

fn bilinear(image: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = (image.width() as f32, image.height() as f32);
    if x < -1.0 || y < -1.0 || x > w || y > h {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let mut acc = [0.0f32; 4];
    for (dx, dy, weight) in [
        (0.0, 0.0, (1.0 - fx) * (1.0 - fy)),
        (1.0, 0.0, fx * (1.0 - fy)),
        (0.0, 1.0, (1.0 - fx) * fy),
        (1.0, 1.0, fx * fy),
    ] {
        let px = x0 + dx;
        let py = y0 + dy;
        // Out-of-bounds taps contribute transparent black.
        if px < 0.0 || py < 0.0 || px >= w || py >= h {
            continue;
        }
        let p = image.get_pixel(px as u32, py as u32);
        for c in 0..4 {
            acc[c] += p[c] as f32 * weight;
        }
    }

    Rgba([
        acc[0].round().clamp(0.0, 255.0) as u8,
        acc[1].round().clamp(0.0, 255.0) as u8,
        acc[2].round().clamp(0.0, 255.0) as u8,
        acc[3].round().clamp(0.0, 255.0) as u8,
    ])
}

/// Crop the center `width` x `height` region, the caller-side clamp for
/// operations whose extent grew. Images already at or below the requested
/// size are returned unchanged.
pub fn crop_centered(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.width() <= width && image.height() <= height {
        return image.clone();
    }
    let x = (image.width().saturating_sub(width)) / 2;
    let y = (image.height().saturating_sub(height)) / 2;
    imageops::crop_imm(image, x, y, width.min(image.width()), height.min(image.height()))
        .to_image()
}

// ============================================================
// Named filter chains
// ============================================================

/// Document enhancer: stretch luminance between the 2% and 98% percentiles,
/// then sharpen luminance for legibility.
pub fn document_enhancer(image: &RgbaImage) -> RgbaImage {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        let l = luma(to_f32(pixel[0]), to_f32(pixel[1]), to_f32(pixel[2]));
        histogram[to_u8(l) as usize] += 1;
    }

    let total: u32 = histogram.iter().sum();
    let low = percentile(&histogram, total, 0.02);
    let high = percentile(&histogram, total, 0.98);
    let range = (high - low).max(1.0 / 255.0);

    let stretched = map_rgb(image, |r, g, b| {
        (
            (r - low) / range,
            (g - low) / range,
            (b - low) / range,
        )
    });

    sharpen_luminance(&stretched)
}

fn percentile(histogram: &[u32; 256], total: u32, fraction: f32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let threshold = (total as f32 * fraction) as u32;
    let mut seen = 0u32;
    for (value, count) in histogram.iter().enumerate() {
        seen += count;
        if seen > threshold {
            return value as f32 / 255.0;
        }
    }
    1.0
}

/// Per-channel histogram equalization.
pub fn color_histogram(image: &RgbaImage) -> RgbaImage {
    let pixel_count = (image.width() * image.height()).max(1);
    let mut lookup = [[0u8; 256]; 3];

    for c in 0..3 {
        let mut histogram = [0u32; 256];
        for pixel in image.pixels() {
            histogram[pixel[c] as usize] += 1;
        }

        let mut cumulative = 0u32;
        for value in 0..256 {
            cumulative += histogram[value];
            lookup[c][value] = ((cumulative as f32 / pixel_count as f32) * 255.0) as u8;
        }
    }

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for c in 0..3 {
            pixel[c] = lookup[c][pixel[c] as usize];
        }
    }
    out
}
