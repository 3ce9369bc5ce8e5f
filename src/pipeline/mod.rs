// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame transform pipeline
//!
//! One frame goes through up to three stages, in an order that is a design
//! invariant:
//!
//! ```text
//! raw frame → ML stage → named-filter stage → tone/geometry stage → output
//! ```
//!
//! 1. **ML stage**: the frame is handed to the [`FrameClassifier`]; a missing
//!    model or failed inference passes the frame through unchanged.
//! 2. **Named-filter stage**: the selected named filter first, then each
//!    enabled toggle filter in a fixed sequence.
//! 3. **Tone/geometry stage**: the continuous adjustments in a fixed
//!    sequence, rotation last.
//!
//! Every stage fails open: no filter failure can abort the pipeline or blank
//! a frame. A reviewer always sees something.

pub mod backend;
pub mod classifier;
pub mod ops;

pub use backend::{CpuFilterBackend, FilterBackend, FilterOp};
pub use classifier::{FrameClassifier, NoopClassifier};
pub use ops::crop_centered;

use crate::config::{NamedFilter, PipelineConfig};
use crate::constants::neutral;
use crate::preset::FilterPreset;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Build the ordered operation sequence for one transform call.
///
/// The sequence encodes the ordering invariants: named filter first, toggles
/// in their fixed order, tone adjustments in their fixed order, rotation
/// last. Tone ops at their neutral value are omitted: running them would be
/// an identity by definition, and omitting them keeps the neutral transform
/// byte-exact.
pub fn build_ops(config: &PipelineConfig, preset: &FilterPreset) -> Vec<FilterOp> {
    let mut sequence = Vec::new();

    match config.selected_filter {
        NamedFilter::Original => {}
        NamedFilter::DocumentEnhancer => sequence.push(FilterOp::DocumentEnhancer),
        NamedFilter::ColorHistogram => sequence.push(FilterOp::ColorHistogram),
    }

    let toggles = [
        (preset.invert, FilterOp::ColorInvert),
        (preset.posterize, FilterOp::Posterize),
        (preset.sharpen_luminance, FilterOp::SharpenLuminance),
        (preset.unsharp_mask, FilterOp::UnsharpMask),
        (preset.edges, FilterOp::Edges),
        (preset.gabor_gradients, FilterOp::GaborGradients),
        (preset.color_clamp, FilterOp::ColorClamp),
        (preset.convolution_3x3, FilterOp::Convolution3x3),
    ];
    for (enabled, op) in toggles {
        if enabled {
            sequence.push(op);
        }
    }

    if preset.brightness != neutral::BRIGHTNESS
        || preset.contrast != neutral::CONTRAST
        || preset.saturation != neutral::SATURATION
    {
        sequence.push(FilterOp::ColorControls {
            brightness: preset.brightness,
            contrast: preset.contrast,
            saturation: preset.saturation,
        });
    }
    if preset.gamma != neutral::GAMMA {
        sequence.push(FilterOp::GammaAdjust {
            power: preset.gamma,
        });
    }
    if preset.hue != neutral::HUE {
        sequence.push(FilterOp::HueAdjust { angle: preset.hue });
    }
    if preset.highlight_amount != neutral::HIGHLIGHT_AMOUNT
        || preset.shadow_amount != neutral::SHADOW_AMOUNT
    {
        sequence.push(FilterOp::HighlightShadowAdjust {
            highlight: preset.highlight_amount,
            shadow: preset.shadow_amount,
        });
    }
    if preset.temperature != neutral::TEMPERATURE || preset.tint != neutral::TINT {
        sequence.push(FilterOp::TemperatureTint {
            temperature: preset.temperature,
            tint: preset.tint,
        });
    }
    if preset.white_point != neutral::WHITE_POINT {
        sequence.push(FilterOp::WhitePointAdjust {
            white: preset.white_point,
        });
    }

    if preset.rotate_angle != neutral::ROTATE_ANGLE {
        sequence.push(FilterOp::Rotate {
            degrees: preset.rotate_angle,
        });
    }

    sequence
}

/// The per-frame transform pipeline.
///
/// `transform` is pure: identical frame, config, and preset produce identical
/// output for a deterministic backend. The pipeline holds no session state
/// and is safe to call from any thread.
pub struct FramePipeline<B = CpuFilterBackend> {
    backend: B,
    classifier: Option<Arc<dyn FrameClassifier>>,
}

impl FramePipeline<CpuFilterBackend> {
    /// Pipeline over the built-in CPU backend, no classifier loaded.
    pub fn new() -> Self {
        Self {
            backend: CpuFilterBackend,
            classifier: None,
        }
    }
}

impl Default for FramePipeline<CpuFilterBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: FilterBackend> FramePipeline<B> {
    /// Pipeline over a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            classifier: None,
        }
    }

    /// Attach a frame classifier for the ML stage.
    pub fn with_classifier(mut self, classifier: Arc<dyn FrameClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Model description for UI display, when a classifier is attached.
    pub fn classifier_name(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.name())
    }

    /// Transform one frame.
    ///
    /// Output dimensions match the input unless the classifier resizes or a
    /// non-zero rotation grows the extent; callers needing a fixed output
    /// size clamp with [`crop_centered`].
    pub fn transform(
        &self,
        frame: &RgbaImage,
        config: &PipelineConfig,
        preset: &FilterPreset,
    ) -> RgbaImage {
        let mut image = frame.clone();

        if config.apply_ml_model {
            let target = config
                .ml_target_size
                .unwrap_or((image.width(), image.height()));
            match self.classifier.as_deref() {
                Some(classifier) => match classifier.infer(&image, target) {
                    Some(output) => {
                        debug!(
                            model = classifier.name(),
                            width = output.width(),
                            height = output.height(),
                            "ML stage produced a frame"
                        );
                        image = output;
                    }
                    None => {
                        warn!(model = classifier.name(), "Inference returned nothing, passing frame through");
                    }
                },
                None => {
                    warn!("ML stage enabled without a model, passing frame through");
                }
            }
        }

        if config.filters_enabled() {
            for op in build_ops(config, preset) {
                match self.backend.apply(&op, &image) {
                    Some(next) => image = next,
                    None => {
                        warn!(op = op.name(), "Filter op failed, carrying previous image");
                    }
                }
            }
        }

        image
    }
}
