// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the filter-pipeline engine
//!
//! Individual filter operations never surface errors (they fail open inside
//! the pipeline); these types cover the user-visible failures: asset and
//! index writes, preset encoding, and capture.

use std::fmt;
use std::path::PathBuf;

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Main engine error type
#[derive(Debug)]
pub enum EngineError {
    /// Gallery persistence errors
    Gallery(GalleryError),
    /// Preset persistence errors
    Preset(PresetError),
    /// Frame capture errors
    Capture(CaptureError),
}

/// Gallery-specific errors
#[derive(Debug)]
pub enum GalleryError {
    /// Failed to create the gallery root directory
    CreateRoot(PathBuf, std::io::Error),
    /// Failed to encode a captured frame as PNG
    AssetEncode(String),
    /// Failed to write an asset file
    AssetWrite(PathBuf, std::io::Error),
    /// Failed to write the index file
    IndexWrite(PathBuf, std::io::Error),
    /// Failed to serialize the index
    IndexEncode(String),
}

/// Preset persistence errors
#[derive(Debug)]
pub enum PresetError {
    /// Failed to serialize a preset
    Encode(String),
    /// Failed to write a preset file
    Write(PathBuf, std::io::Error),
}

/// Capture errors
#[derive(Debug)]
pub enum CaptureError {
    /// The frame source had no frame to offer
    NoFrameAvailable,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Gallery(e) => write!(f, "Gallery error: {}", e),
            EngineError::Preset(e) => write!(f, "Preset error: {}", e),
            EngineError::Capture(e) => write!(f, "Capture error: {}", e),
        }
    }
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::CreateRoot(path, e) => {
                write!(f, "Failed to create gallery root {}: {}", path.display(), e)
            }
            GalleryError::AssetEncode(msg) => write!(f, "Asset encoding failed: {}", msg),
            GalleryError::AssetWrite(path, e) => {
                write!(f, "Failed to write asset {}: {}", path.display(), e)
            }
            GalleryError::IndexWrite(path, e) => {
                write!(f, "Failed to write index {}: {}", path.display(), e)
            }
            GalleryError::IndexEncode(msg) => write!(f, "Index serialization failed: {}", msg),
        }
    }
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::Encode(msg) => write!(f, "Failed to serialize preset: {}", msg),
            PresetError::Write(path, e) => {
                write!(f, "Failed to write preset {}: {}", path.display(), e)
            }
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for GalleryError {}
impl std::error::Error for PresetError {}
impl std::error::Error for CaptureError {}

impl From<GalleryError> for EngineError {
    fn from(err: GalleryError) -> Self {
        EngineError::Gallery(err)
    }
}

impl From<PresetError> for EngineError {
    fn from(err: PresetError) -> Self {
        EngineError::Preset(err)
    }
}

impl From<CaptureError> for EngineError {
    fn from(err: CaptureError) -> Self {
        EngineError::Capture(err)
    }
}
