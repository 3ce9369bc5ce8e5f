// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the frame transform pipeline
//!
//! Covers the identity law, the stage-order invariant, the fail-open policy,
//! and the deterministic tone scenario.

use framesift::{
    CpuFilterBackend, FilterBackend, FilterOp, FrameClassifier, FramePipeline, FilterPreset,
    NamedFilter, PipelineConfig,
};
use image::{Rgba, RgbaImage, imageops};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Backend that records the order of applied ops and can be told to fail
/// specific ops, delegating the actual pixel work to the CPU backend.
struct RecordingBackend {
    inner: CpuFilterBackend,
    applied: Arc<Mutex<Vec<&'static str>>>,
    failing: HashSet<&'static str>,
}

impl RecordingBackend {
    /// Returns the backend plus a shared handle onto its application log.
    fn new() -> (Self, Arc<Mutex<Vec<&'static str>>>) {
        let applied = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                inner: CpuFilterBackend,
                applied: Arc::clone(&applied),
                failing: HashSet::new(),
            },
            applied,
        )
    }

    fn failing_on(op_name: &'static str) -> Self {
        let (mut backend, _) = Self::new();
        backend.failing.insert(op_name);
        backend
    }
}

impl FilterBackend for RecordingBackend {
    fn apply(&self, op: &FilterOp, image: &RgbaImage) -> Option<RgbaImage> {
        if self.failing.contains(op.name()) {
            return None;
        }
        self.applied.lock().expect("recording lock").push(op.name());
        self.inner.apply(op, image)
    }
}

fn gradient_frame() -> RgbaImage {
    RgbaImage::from_fn(24, 16, |x, y| {
        Rgba([(x * 10) as u8, (y * 14) as u8, 160, 255])
    })
}

fn filter_config() -> PipelineConfig {
    PipelineConfig {
        apply_filter: true,
        ..Default::default()
    }
}

#[test]
fn test_identity_law_under_neutral_defaults() {
    let frame = gradient_frame();
    let pipeline = FramePipeline::new();

    // Every toggle false, named filter Original, all tone values neutral:
    // the transform must be a byte-identical no-op.
    let output = pipeline.transform(&frame, &filter_config(), &FilterPreset::neutral());
    assert_eq!(output, frame);

    // With the filter stage disabled entirely the same holds.
    let output = pipeline.transform(&frame, &PipelineConfig::default(), &FilterPreset::neutral());
    assert_eq!(output, frame);
}

#[test]
fn test_invert_always_precedes_posterize() {
    let mut preset = FilterPreset::neutral();
    preset.invert = true;
    preset.posterize = true;

    let (backend, applied) = RecordingBackend::new();
    let pipeline = FramePipeline::with_backend(backend);
    pipeline.transform(&gradient_frame(), &filter_config(), &preset);

    let log = applied.lock().expect("recording lock");
    let invert_at = log.iter().position(|n| *n == "color_invert").unwrap();
    let posterize_at = log.iter().position(|n| *n == "posterize").unwrap();
    assert!(invert_at < posterize_at);
}

#[test]
fn test_recorded_application_order_matches_declared_order() {
    let mut preset = FilterPreset::neutral();
    preset.invert = true;
    preset.posterize = true;
    preset.edges = true;
    preset.gamma = 0.8;
    preset.rotate_angle = 180.0;

    let (backend, applied) = RecordingBackend::new();
    let pipeline = FramePipeline::with_backend(backend);
    pipeline.transform(&gradient_frame(), &filter_config(), &preset);

    assert_eq!(
        *applied.lock().expect("recording lock"),
        vec![
            "color_invert",
            "posterize",
            "edges",
            "gamma_adjust",
            "rotate"
        ]
    );
}

#[test]
fn test_failed_op_is_skipped_not_fatal() {
    let mut preset = FilterPreset::neutral();
    preset.invert = true;
    preset.edges = true;

    let frame = gradient_frame();

    // Backend that refuses the edges op: output must equal the run where the
    // edges toggle is simply disabled.
    let failing = FramePipeline::with_backend(RecordingBackend::failing_on("edges"));
    let with_failure = failing.transform(&frame, &filter_config(), &preset);

    let mut without_edges = preset;
    without_edges.edges = false;
    let clean = FramePipeline::new();
    let expected = clean.transform(&frame, &filter_config(), &without_edges);

    assert_eq!(with_failure, expected);
}

#[test]
fn test_every_op_failing_degrades_to_identity() {
    let mut preset = FilterPreset::neutral();
    preset.invert = true;
    preset.posterize = true;
    preset.brightness = 0.4;
    preset.rotate_angle = 45.0;

    struct RefuseAll;
    impl FilterBackend for RefuseAll {
        fn apply(&self, _op: &FilterOp, _image: &RgbaImage) -> Option<RgbaImage> {
            None
        }
    }

    let frame = gradient_frame();
    let pipeline = FramePipeline::with_backend(RefuseAll);
    let output = pipeline.transform(&frame, &filter_config(), &preset);
    assert_eq!(output, frame);
}

#[test]
fn test_tone_scenario_solid_gray() {
    // brightness 0.5, contrast 2.0, everything else neutral, over mid-gray:
    // 128/255 + 0.5 pushes past 1.0 before the contrast step, so the result
    // saturates to full white under the documented formulas.
    let mut preset = FilterPreset::neutral();
    preset.brightness = 0.5;
    preset.contrast = 2.0;

    let frame = RgbaImage::from_pixel(9, 9, Rgba([128, 128, 128, 255]));
    let pipeline = FramePipeline::new();
    let output = pipeline.transform(&frame, &filter_config(), &preset);

    for pixel in output.pixels() {
        assert_eq!(pixel, &Rgba([255, 255, 255, 255]));
    }
}

#[test]
fn test_transform_is_deterministic() {
    let mut preset = FilterPreset::neutral();
    preset.unsharp_mask = true;
    preset.gamma = 1.7;
    preset.temperature = 4000.0;

    let frame = gradient_frame();
    let pipeline = FramePipeline::new();
    let a = pipeline.transform(&frame, &filter_config(), &preset);
    let b = pipeline.transform(&frame, &filter_config(), &preset);
    assert_eq!(a, b);
}

// ============================================================
// ML stage
// ============================================================

/// Classifier that scales frames to the requested target size.
struct ResizeClassifier;

impl FrameClassifier for ResizeClassifier {
    fn name(&self) -> &str {
        "resize-test-model"
    }

    fn infer(&self, image: &RgbaImage, target_size: (u32, u32)) -> Option<RgbaImage> {
        Some(imageops::resize(
            image,
            target_size.0,
            target_size.1,
            imageops::FilterType::Nearest,
        ))
    }
}

/// Classifier that always fails.
struct BrokenClassifier;

impl FrameClassifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken-test-model"
    }

    fn infer(&self, _image: &RgbaImage, _target_size: (u32, u32)) -> Option<RgbaImage> {
        None
    }
}

#[test]
fn test_ml_stage_runs_before_filters() {
    let config = PipelineConfig {
        apply_filter: true,
        apply_ml_model: true,
        ml_target_size: Some((8, 8)),
        ..Default::default()
    };
    let mut preset = FilterPreset::neutral();
    preset.invert = true;

    let pipeline = FramePipeline::new().with_classifier(std::sync::Arc::new(ResizeClassifier));
    let frame = gradient_frame();
    let output = pipeline.transform(&frame, &config, &preset);

    // Inference resized first, then the invert ran over the resized frame.
    assert_eq!(output.dimensions(), (8, 8));
    let resized = imageops::resize(&frame, 8, 8, imageops::FilterType::Nearest);
    let expected_top_left = resized.get_pixel(0, 0);
    let inverted = output.get_pixel(0, 0);
    assert_eq!(inverted[0], 255 - expected_top_left[0]);
}

#[test]
fn test_ml_failure_passes_frame_through() {
    let config = PipelineConfig {
        apply_ml_model: true,
        ..Default::default()
    };
    let frame = gradient_frame();

    // Inference failing and no model loaded behave identically.
    let broken = FramePipeline::new().with_classifier(std::sync::Arc::new(BrokenClassifier));
    assert_eq!(
        broken.transform(&frame, &config, &FilterPreset::neutral()),
        frame
    );

    let absent = FramePipeline::new();
    assert_eq!(
        absent.transform(&frame, &config, &FilterPreset::neutral()),
        frame
    );
}

#[test]
fn test_noop_classifier_reports_no_model() {
    use framesift::NoopClassifier;

    let absent = FramePipeline::new();
    assert_eq!(absent.classifier_name(), None);

    let placeholder = FramePipeline::new().with_classifier(std::sync::Arc::new(NoopClassifier));
    assert_eq!(placeholder.classifier_name(), Some("None"));

    // The placeholder behaves exactly like a failed inference.
    let config = PipelineConfig {
        apply_ml_model: true,
        ..Default::default()
    };
    let frame = gradient_frame();
    assert_eq!(
        placeholder.transform(&frame, &config, &FilterPreset::neutral()),
        frame
    );
}

#[test]
fn test_post_ml_filters_gate() {
    // apply_post_ml_filters alone is enough to run the filter stage.
    let config = PipelineConfig {
        apply_post_ml_filters: true,
        ..Default::default()
    };
    let mut preset = FilterPreset::neutral();
    preset.invert = true;

    let frame = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
    let pipeline = FramePipeline::new();
    let output = pipeline.transform(&frame, &config, &preset);
    assert_eq!(output.get_pixel(0, 0), &Rgba([245, 235, 225, 255]));
}

#[test]
fn test_named_filter_changes_output_before_toggles() {
    let config = PipelineConfig {
        apply_filter: true,
        selected_filter: NamedFilter::ColorHistogram,
        ..Default::default()
    };

    let frame = gradient_frame();
    let pipeline = FramePipeline::new();
    let with_named = pipeline.transform(&frame, &config, &FilterPreset::neutral());
    let without = pipeline.transform(&frame, &filter_config(), &FilterPreset::neutral());
    assert_ne!(with_named, without);
}
