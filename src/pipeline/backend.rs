// SPDX-License-Identifier: GPL-3.0-only

//! Filter operation dispatch
//!
//! The pipeline never branches on preset booleans directly; it builds an
//! ordered sequence of [`FilterOp`] values and hands each one to a
//! [`FilterBackend`]. A backend returning `None` for an op means the op is
//! unsupported or failed, and the pipeline carries the previous image
//! forward.

use super::ops;
use image::RgbaImage;

/// One filter operation, parameters included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Named filter: contrast stretch + luminance sharpen
    DocumentEnhancer,
    /// Named filter: per-channel histogram equalization
    ColorHistogram,
    ColorInvert,
    Posterize,
    SharpenLuminance,
    UnsharpMask,
    Edges,
    GaborGradients,
    ColorClamp,
    Convolution3x3,
    ColorControls {
        brightness: f32,
        contrast: f32,
        saturation: f32,
    },
    GammaAdjust {
        power: f32,
    },
    HueAdjust {
        angle: f32,
    },
    HighlightShadowAdjust {
        highlight: f32,
        shadow: f32,
    },
    TemperatureTint {
        temperature: f32,
        tint: f32,
    },
    WhitePointAdjust {
        white: f32,
    },
    Rotate {
        degrees: f32,
    },
}

impl FilterOp {
    /// Stable name for logging and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::DocumentEnhancer => "document_enhancer",
            FilterOp::ColorHistogram => "color_histogram",
            FilterOp::ColorInvert => "color_invert",
            FilterOp::Posterize => "posterize",
            FilterOp::SharpenLuminance => "sharpen_luminance",
            FilterOp::UnsharpMask => "unsharp_mask",
            FilterOp::Edges => "edges",
            FilterOp::GaborGradients => "gabor_gradients",
            FilterOp::ColorClamp => "color_clamp",
            FilterOp::Convolution3x3 => "convolution_3x3",
            FilterOp::ColorControls { .. } => "color_controls",
            FilterOp::GammaAdjust { .. } => "gamma_adjust",
            FilterOp::HueAdjust { .. } => "hue_adjust",
            FilterOp::HighlightShadowAdjust { .. } => "highlight_shadow_adjust",
            FilterOp::TemperatureTint { .. } => "temperature_tint",
            FilterOp::WhitePointAdjust { .. } => "white_point_adjust",
            FilterOp::Rotate { .. } => "rotate",
        }
    }
}

/// Applies named filter operations to frames.
///
/// Implementations must be deterministic: the pipeline's purity guarantee is
/// only as strong as the backend's.
pub trait FilterBackend {
    /// Apply one operation. `None` means the op could not be applied; the
    /// caller keeps the previous image (fail-open).
    fn apply(&self, op: &FilterOp, image: &RgbaImage) -> Option<RgbaImage>;
}

/// Pure-CPU backend implementing every operation in plain Rust.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuFilterBackend;

impl FilterBackend for CpuFilterBackend {
    fn apply(&self, op: &FilterOp, image: &RgbaImage) -> Option<RgbaImage> {
        let out = match *op {
            FilterOp::DocumentEnhancer => ops::document_enhancer(image),
            FilterOp::ColorHistogram => ops::color_histogram(image),
            FilterOp::ColorInvert => ops::color_invert(image),
            FilterOp::Posterize => ops::posterize(image),
            FilterOp::SharpenLuminance => ops::sharpen_luminance(image),
            FilterOp::UnsharpMask => ops::unsharp_mask(image),
            FilterOp::Edges => ops::edges(image),
            FilterOp::GaborGradients => ops::gabor_gradients(image),
            FilterOp::ColorClamp => ops::color_clamp(image),
            FilterOp::Convolution3x3 => ops::convolution_3x3(image),
            FilterOp::ColorControls {
                brightness,
                contrast,
                saturation,
            } => ops::color_controls(image, brightness, contrast, saturation),
            FilterOp::GammaAdjust { power } => ops::gamma_adjust(image, power),
            FilterOp::HueAdjust { angle } => ops::hue_adjust(image, angle),
            FilterOp::HighlightShadowAdjust { highlight, shadow } => {
                ops::highlight_shadow(image, highlight, shadow)
            }
            FilterOp::TemperatureTint { temperature, tint } => {
                ops::temperature_tint(image, temperature, tint)
            }
            FilterOp::WhitePointAdjust { white } => ops::white_point(image, white),
            FilterOp::Rotate { degrees } => ops::rotate(image, degrees),
        };
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_cpu_backend_supports_every_op() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([64, 128, 192, 255]));
        let ops = [
            FilterOp::DocumentEnhancer,
            FilterOp::ColorHistogram,
            FilterOp::ColorInvert,
            FilterOp::Posterize,
            FilterOp::SharpenLuminance,
            FilterOp::UnsharpMask,
            FilterOp::Edges,
            FilterOp::GaborGradients,
            FilterOp::ColorClamp,
            FilterOp::Convolution3x3,
            FilterOp::ColorControls {
                brightness: 0.1,
                contrast: 1.2,
                saturation: 0.8,
            },
            FilterOp::GammaAdjust { power: 2.2 },
            FilterOp::HueAdjust { angle: 1.0 },
            FilterOp::HighlightShadowAdjust {
                highlight: 0.5,
                shadow: 0.2,
            },
            FilterOp::TemperatureTint {
                temperature: 4500.0,
                tint: 30.0,
            },
            FilterOp::WhitePointAdjust { white: 1.5 },
            FilterOp::Rotate { degrees: 30.0 },
        ];

        let backend = CpuFilterBackend;
        for op in ops {
            assert!(backend.apply(&op, &image).is_some(), "op {}", op.name());
        }
    }

    #[test]
    fn test_cpu_backend_is_deterministic() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 90, 170, 255]));
        let backend = CpuFilterBackend;
        let op = FilterOp::GammaAdjust { power: 0.7 };

        let a = backend.apply(&op, &image).unwrap();
        let b = backend.apply(&op, &image).unwrap();
        assert_eq!(a, b);
    }
}
