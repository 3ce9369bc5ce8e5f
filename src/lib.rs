// SPDX-License-Identifier: GPL-3.0-only

//! Framesift - per-frame filter pipeline engine for forensic frame review
//!
//! This library provides the processing core of a forensic frame-review
//! tool: an ordered chain of image transforms applied to each video frame or
//! still image, with preset persistence and a capture gallery.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`pipeline`]: The per-frame transform pipeline and its filter backend
//! - [`preset`]: Filter presets and their blob persistence
//! - [`config`]: Per-session pipeline configuration
//! - [`gallery`]: Captured frame gallery with index-file persistence
//! - [`capture`]: Still-capture path from a frame source into the gallery
//! - [`render`]: Live composition path with latest-wins scheduling
//!
//! # Example
//!
//! ```
//! use framesift::{FilterPreset, FramePipeline, PipelineConfig};
//! use image::RgbaImage;
//!
//! let pipeline = FramePipeline::new();
//! let mut preset = FilterPreset::neutral();
//! preset.brightness = 0.2;
//!
//! let config = PipelineConfig {
//!     apply_filter: true,
//!     ..Default::default()
//! };
//!
//! let frame = RgbaImage::new(16, 16);
//! let output = pipeline.transform(&frame, &config, &preset);
//! assert_eq!(output.dimensions(), frame.dimensions());
//! ```

pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gallery;
pub mod pipeline;
pub mod preset;
pub mod render;

// Re-export commonly used types
pub use capture::{FrameSource, capture_still};
pub use config::{NamedFilter, PipelineConfig};
pub use errors::{CaptureError, EngineError, EngineResult, GalleryError, PresetError};
pub use gallery::{GalleryImage, GalleryStore};
pub use pipeline::{
    CpuFilterBackend, FilterBackend, FilterOp, FrameClassifier, FramePipeline, NoopClassifier,
    build_ops, crop_centered,
};
pub use preset::{FilterPreset, default_preset_path};
pub use render::{RenderQueue, RenderRequest, RenderedFrame, spawn_render_worker};
