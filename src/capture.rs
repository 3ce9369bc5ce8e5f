// SPDX-License-Identifier: GPL-3.0-only

//! Still capture path
//!
//! One raw frame is pulled from whatever is showing (the paused playback
//! position or an imported file), run through the pipeline with the live
//! preset, and appended to the gallery together with that preset, frozen.

use crate::config::PipelineConfig;
use crate::errors::{CaptureError, EngineResult};
use crate::gallery::{GalleryImage, GalleryStore};
use crate::pipeline::{FilterBackend, FramePipeline};
use crate::preset::FilterPreset;
use image::RgbaImage;
use tracing::{debug, info};

/// Still-capture adapter contract: whoever owns playback (or an imported
/// file) supplies the visible frame and the live slider state on demand.
pub trait FrameSource {
    /// The frame visible at the current playback position, if any.
    fn current_frame(&self) -> Option<RgbaImage>;

    /// The live slider state at capture time.
    fn current_preset(&self) -> FilterPreset;
}

/// Capture the source's current frame into the gallery.
///
/// The frame goes through the pipeline under the session config before it is
/// persisted; with an all-neutral config this stores the raw frame. The
/// preset snapshot rides along unmodified either way.
pub fn capture_still<B: FilterBackend>(
    source: &dyn FrameSource,
    pipeline: &FramePipeline<B>,
    config: &PipelineConfig,
    gallery: &mut GalleryStore,
) -> EngineResult<GalleryImage> {
    let frame = source
        .current_frame()
        .ok_or(CaptureError::NoFrameAvailable)?;
    let preset = source.current_preset();

    debug!(
        width = frame.width(),
        height = frame.height(),
        "Capturing still frame"
    );

    let transformed = pipeline.transform(&frame, config, &preset);
    let entry = gallery.append(&transformed, preset)?;

    info!(id = %entry.id, index = entry.index, "Still frame captured");
    Ok(entry)
}
