// SPDX-License-Identifier: GPL-3.0-only

//! Opaque frame classifier/transformer seam
//!
//! The ML stage is an external service: a model takes a frame at a target
//! resolution and returns a transformed frame, or nothing. The engine treats
//! "no model loaded" and "inference failed" identically; the stage passes
//! the input through unchanged.

use image::RgbaImage;

/// Opaque per-frame inference service.
pub trait FrameClassifier: Send + Sync {
    /// Human-readable model description, surfaced in UIs as "Model: <name>".
    fn name(&self) -> &str;

    /// Run inference on one frame at the given target resolution.
    ///
    /// `None` means inference produced no result; the pipeline degrades to a
    /// pass-through. Implementations may return an image of a different
    /// resolution than the input.
    fn infer(&self, image: &RgbaImage, target_size: (u32, u32)) -> Option<RgbaImage>;
}

/// Placeholder classifier used when no model is loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

impl FrameClassifier for NoopClassifier {
    fn name(&self) -> &str {
        "None"
    }

    fn infer(&self, _image: &RgbaImage, _target_size: (u32, u32)) -> Option<RgbaImage> {
        None
    }
}
