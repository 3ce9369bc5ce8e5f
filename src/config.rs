// SPDX-License-Identifier: GPL-3.0-only

//! Session configuration for the frame pipeline
//!
//! These toggles gate which pipeline stages run. They are UI session state,
//! passed explicitly into every `transform` call; they are not part of a
//! [`crate::preset::FilterPreset`] and are never persisted with one.

use serde::{Deserialize, Serialize};

/// Predefined named filter chains selectable ahead of the per-parameter
/// adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamedFilter {
    /// No named filter, frames pass straight to the toggle filters
    #[default]
    Original,
    /// Contrast stretch plus luminance sharpen, tuned for document legibility
    DocumentEnhancer,
    /// Per-channel histogram equalization
    ColorHistogram,
}

impl NamedFilter {
    /// All variants, for UI iteration
    pub const ALL: [NamedFilter; 3] = [
        NamedFilter::Original,
        NamedFilter::DocumentEnhancer,
        NamedFilter::ColorHistogram,
    ];

    /// Get display name for the filter
    pub fn display_name(&self) -> &'static str {
        match self {
            NamedFilter::Original => "Original",
            NamedFilter::DocumentEnhancer => "DocumentEnhancer",
            NamedFilter::ColorHistogram => "ColorHistogram",
        }
    }

    /// Parse a display name back into a variant
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.display_name() == name)
    }
}

/// Per-session pipeline configuration
///
/// An immutable value passed into `transform` on every call; the engine holds
/// no ambient session state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run the named-filter/toggle/tone stage
    pub apply_filter: bool,
    /// Run the ML stage before any filters
    pub apply_ml_model: bool,
    /// Run the filter stage even when `apply_filter` is off (post-ML cleanup)
    pub apply_post_ml_filters: bool,
    /// Named filter applied ahead of the toggle filters
    pub selected_filter: NamedFilter,
    /// Target resolution handed to the classifier; `None` keeps the frame size
    pub ml_target_size: Option<(u32, u32)>,
}

impl PipelineConfig {
    /// Whether the named-filter stage runs at all
    pub fn filters_enabled(&self) -> bool {
        self.apply_filter || self.apply_post_ml_filters
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            apply_filter: false,
            apply_ml_model: false,
            apply_post_ml_filters: false,
            selected_filter: NamedFilter::Original,
            ml_target_size: None,
        }
    }
}
