// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for preset persistence

use framesift::FilterPreset;

const TOLERANCE: f32 = 1e-6;

fn busy_preset() -> FilterPreset {
    FilterPreset {
        brightness: 0.35,
        contrast: 1.8,
        saturation: 0.6,
        exposure: -1.25,
        gamma: 2.2,
        hue: 1.0471976,
        highlight_amount: 0.4,
        shadow_amount: -0.3,
        temperature: 3200.0,
        tint: 42.0,
        white_point: 1.1,
        rotate_angle: 270.0,
        invert: true,
        posterize: false,
        sharpen_luminance: true,
        unsharp_mask: false,
        edges: true,
        gabor_gradients: false,
        color_clamp: true,
        convolution_3x3: false,
    }
}

#[test]
fn test_blob_round_trip() {
    let preset = busy_preset();
    let blob = preset.to_blob().expect("preset must serialize");
    let restored = FilterPreset::from_blob(&blob).expect("blob must decode");

    assert!(
        restored.approx_eq(&preset, TOLERANCE),
        "round trip drifted: {:?} vs {:?}",
        restored,
        preset
    );
}

#[test]
fn test_missing_fields_default_to_neutral() {
    // A blob written by an older build that only knew two sliders.
    let blob = br#"{"brightness": 0.5, "invert": true}"#;
    let restored = FilterPreset::from_blob(blob).expect("partial blob must decode");

    assert!((restored.brightness - 0.5).abs() <= TOLERANCE);
    assert!(restored.invert);

    // Everything absent falls back to the neutral default.
    assert_eq!(restored.contrast, 1.0);
    assert_eq!(restored.temperature, 6500.0);
    assert_eq!(restored.highlight_amount, 1.0);
    assert_eq!(restored.rotate_angle, 0.0);
    assert!(!restored.posterize);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let blob = br#"{"brightness": 0.1, "vibrance": 0.9, "lens_blur": true}"#;
    let restored = FilterPreset::from_blob(blob).expect("forward-compatible decode");
    assert!((restored.brightness - 0.1).abs() <= TOLERANCE);
}

#[test]
fn test_corrupt_blob_restores_nothing() {
    assert!(FilterPreset::from_blob(b"not json at all").is_none());
    assert!(FilterPreset::from_blob(b"").is_none());
    // Wrong shape entirely.
    assert!(FilterPreset::from_blob(b"[1, 2, 3]").is_none());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session.json");

    let preset = busy_preset();
    preset.save_to(&path).expect("preset must save");

    let restored = FilterPreset::load_from(&path).expect("preset must load");
    assert!(restored.approx_eq(&preset, TOLERANCE));
}

#[test]
fn test_missing_file_loads_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(FilterPreset::load_from(&dir.path().join("absent.json")).is_none());
}
