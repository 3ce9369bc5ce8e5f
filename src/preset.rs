// SPDX-License-Identifier: GPL-3.0-only

//! Filter presets
//!
//! A preset is an immutable snapshot of every adjustable filter parameter.
//! Presets are built from live slider state on save, restored wholesale, and
//! frozen into each gallery entry at capture time.
//!
//! The blob encoding is a stable, versionless JSON object with one key per
//! field. Decoding is forward compatible: unknown keys are ignored and
//! missing keys fall back to the neutral defaults, so presets written by
//! newer builds still restore. A corrupt blob restores to nothing rather
//! than a partially-populated preset.

use crate::constants::{APP_DIR_NAME, PRESET_FILE, neutral};
use crate::errors::PresetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

fn default_brightness() -> f32 {
    neutral::BRIGHTNESS
}

fn default_contrast() -> f32 {
    neutral::CONTRAST
}

fn default_saturation() -> f32 {
    neutral::SATURATION
}

fn default_exposure() -> f32 {
    neutral::EXPOSURE
}

fn default_gamma() -> f32 {
    neutral::GAMMA
}

fn default_hue() -> f32 {
    neutral::HUE
}

fn default_highlight_amount() -> f32 {
    neutral::HIGHLIGHT_AMOUNT
}

fn default_shadow_amount() -> f32 {
    neutral::SHADOW_AMOUNT
}

fn default_temperature() -> f32 {
    neutral::TEMPERATURE
}

fn default_tint() -> f32 {
    neutral::TINT
}

fn default_white_point() -> f32 {
    neutral::WHITE_POINT
}

fn default_rotate_angle() -> f32 {
    neutral::ROTATE_ANGLE
}

/// Snapshot of all adjustable filter parameters
///
/// Note: `exposure` is captured and serialized with the preset but the tone
/// chain does not consume it. This mirrors the shipped behavior and keeps
/// saved blobs round-tripping unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    /// Additive brightness, -1.0 to 1.0
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    /// Contrast multiplier around mid-gray, 0.0 to 5.0
    #[serde(default = "default_contrast")]
    pub contrast: f32,
    /// Saturation multiplier, 0.0 to 4.0
    #[serde(default = "default_saturation")]
    pub saturation: f32,
    /// Exposure in EV, -2.0 to 2.0
    #[serde(default = "default_exposure")]
    pub exposure: f32,
    /// Gamma power, 0.1 to 3.0
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    /// Hue rotation in radians, 0 to 2π
    #[serde(default = "default_hue")]
    pub hue: f32,
    /// Highlight compression, 0.0 to 1.0 (1.0 = untouched)
    #[serde(default = "default_highlight_amount")]
    pub highlight_amount: f32,
    /// Shadow lift, -1.0 to 1.0
    #[serde(default = "default_shadow_amount")]
    pub shadow_amount: f32,
    /// Neutral color temperature in Kelvin, 1000 to 10000
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Green-magenta tint, -200 to 200
    #[serde(default = "default_tint")]
    pub tint: f32,
    /// White point gain, 0.0 to 2.0
    #[serde(default = "default_white_point")]
    pub white_point: f32,
    /// Final rotation in degrees, 0 to 360
    #[serde(default = "default_rotate_angle")]
    pub rotate_angle: f32,

    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub posterize: bool,
    #[serde(default)]
    pub sharpen_luminance: bool,
    #[serde(default)]
    pub unsharp_mask: bool,
    #[serde(default)]
    pub edges: bool,
    #[serde(default)]
    pub gabor_gradients: bool,
    #[serde(default)]
    pub color_clamp: bool,
    #[serde(default)]
    pub convolution_3x3: bool,
}

impl Default for FilterPreset {
    fn default() -> Self {
        Self::neutral()
    }
}

impl FilterPreset {
    /// The all-neutral preset ("Reset" state): no toggle filters and every
    /// tone adjustment at its identity value.
    pub fn neutral() -> Self {
        Self {
            brightness: neutral::BRIGHTNESS,
            contrast: neutral::CONTRAST,
            saturation: neutral::SATURATION,
            exposure: neutral::EXPOSURE,
            gamma: neutral::GAMMA,
            hue: neutral::HUE,
            highlight_amount: neutral::HIGHLIGHT_AMOUNT,
            shadow_amount: neutral::SHADOW_AMOUNT,
            temperature: neutral::TEMPERATURE,
            tint: neutral::TINT,
            white_point: neutral::WHITE_POINT,
            rotate_angle: neutral::ROTATE_ANGLE,
            invert: false,
            posterize: false,
            sharpen_luminance: false,
            unsharp_mask: false,
            edges: false,
            gabor_gradients: false,
            color_clamp: false,
            convolution_3x3: false,
        }
    }

    /// Clamp every scalar to its documented range.
    ///
    /// Decoded blobs may carry out-of-range values; the pipeline only ever
    /// sees clamped presets.
    pub fn clamped(mut self) -> Self {
        self.brightness = self.brightness.clamp(-1.0, 1.0);
        self.contrast = self.contrast.clamp(0.0, 5.0);
        self.saturation = self.saturation.clamp(0.0, 4.0);
        self.exposure = self.exposure.clamp(-2.0, 2.0);
        self.gamma = self.gamma.clamp(0.1, 3.0);
        self.hue = self.hue.clamp(0.0, 2.0 * std::f32::consts::PI);
        self.highlight_amount = self.highlight_amount.clamp(0.0, 1.0);
        self.shadow_amount = self.shadow_amount.clamp(-1.0, 1.0);
        self.temperature = self.temperature.clamp(1000.0, 10000.0);
        self.tint = self.tint.clamp(-200.0, 200.0);
        self.white_point = self.white_point.clamp(0.0, 2.0);
        self.rotate_angle = self.rotate_angle.clamp(0.0, 360.0);
        self
    }

    /// Scalar-field equality within a tolerance; toggles compare exactly.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        let scalars = [
            (self.brightness, other.brightness),
            (self.contrast, other.contrast),
            (self.saturation, other.saturation),
            (self.exposure, other.exposure),
            (self.gamma, other.gamma),
            (self.hue, other.hue),
            (self.highlight_amount, other.highlight_amount),
            (self.shadow_amount, other.shadow_amount),
            (self.temperature, other.temperature),
            (self.tint, other.tint),
            (self.white_point, other.white_point),
            (self.rotate_angle, other.rotate_angle),
        ];

        scalars.iter().all(|(a, b)| (a - b).abs() <= tolerance)
            && self.invert == other.invert
            && self.posterize == other.posterize
            && self.sharpen_luminance == other.sharpen_luminance
            && self.unsharp_mask == other.unsharp_mask
            && self.edges == other.edges
            && self.gabor_gradients == other.gabor_gradients
            && self.color_clamp == other.color_clamp
            && self.convolution_3x3 == other.convolution_3x3
    }

    /// Serialize to the opaque preset blob.
    pub fn to_blob(&self) -> Result<Vec<u8>, PresetError> {
        serde_json::to_vec(self).map_err(|e| PresetError::Encode(e.to_string()))
    }

    /// Restore a preset from a blob.
    ///
    /// A missing or corrupt blob yields `None`, never a partially-populated
    /// preset. Callers leave their current state untouched on `None`.
    pub fn from_blob(blob: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Self>(blob) {
            Ok(preset) => Some(preset),
            Err(e) => {
                warn!(error = %e, "Preset blob did not decode, keeping current state");
                None
            }
        }
    }

    /// Save this preset to a file.
    pub fn save_to(&self, path: &Path) -> Result<(), PresetError> {
        let blob = self.to_blob()?;
        std::fs::write(path, blob).map_err(|e| PresetError::Write(path.to_path_buf(), e))
    }

    /// Load a preset from a file; missing or corrupt files yield `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        let blob = std::fs::read(path).ok()?;
        Self::from_blob(&blob)
    }
}

/// Default location of the single persisted preset blob.
pub fn default_preset_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join(APP_DIR_NAME).join(PRESET_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_default() {
        assert_eq!(FilterPreset::default(), FilterPreset::neutral());
    }

    #[test]
    fn test_clamped_limits_out_of_range_scalars() {
        let mut preset = FilterPreset::neutral();
        preset.contrast = 99.0;
        preset.brightness = -3.0;
        preset.temperature = 0.0;

        let clamped = preset.clamped();
        assert_eq!(clamped.contrast, 5.0);
        assert_eq!(clamped.brightness, -1.0);
        assert_eq!(clamped.temperature, 1000.0);
    }

    #[test]
    fn test_blob_keys_are_stable() {
        let blob = FilterPreset::neutral().to_blob().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&blob).unwrap();
        let object = value.as_object().unwrap();

        // 12 scalars + 8 toggles, one key each
        assert_eq!(object.len(), 20);
        for key in [
            "brightness",
            "contrast",
            "saturation",
            "exposure",
            "gamma",
            "hue",
            "highlight_amount",
            "shadow_amount",
            "temperature",
            "tint",
            "white_point",
            "rotate_angle",
            "invert",
            "posterize",
            "sharpen_luminance",
            "unsharp_mask",
            "edges",
            "gabor_gradients",
            "color_clamp",
            "convolution_3x3",
        ] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
    }
}
