// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the filter pipeline
//!
//! This module provides command-line functionality for:
//! - Applying a preset to a still image
//! - Capturing stills into the gallery
//! - Listing and editing the gallery
//! - Creating and inspecting preset files

use framesift::{
    FilterPreset, FramePipeline, FrameSource, GalleryStore, NamedFilter, PipelineConfig,
    capture_still, crop_centered,
};
use image::RgbaImage;
use std::path::PathBuf;
use tracing::info;

fn load_preset(path: Option<PathBuf>) -> FilterPreset {
    match path {
        Some(path) => match FilterPreset::load_from(&path) {
            Some(preset) => preset.clamped(),
            None => {
                eprintln!(
                    "Preset {} missing or unreadable, using neutral preset",
                    path.display()
                );
                FilterPreset::neutral()
            }
        },
        None => FilterPreset::neutral(),
    }
}

fn open_gallery(root: Option<PathBuf>) -> Result<GalleryStore, Box<dyn std::error::Error>> {
    match root {
        Some(root) => Ok(GalleryStore::new(root)),
        None => GalleryStore::open_default()
            .ok_or_else(|| "Could not determine the application data directory".into()),
    }
}

fn load_image(path: &PathBuf) -> Result<RgbaImage, Box<dyn std::error::Error>> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?
        .to_rgba8();
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Image loaded"
    );
    Ok(image)
}

/// Apply a preset (and optional named filter) to a still image
pub fn apply(
    input: PathBuf,
    output: Option<PathBuf>,
    preset_path: Option<PathBuf>,
    filter: &str,
    clamp: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(named) = NamedFilter::from_name(filter) else {
        let names: Vec<&str> = NamedFilter::ALL.iter().map(|f| f.display_name()).collect();
        return Err(format!("Unknown filter {:?}, expected one of {}", filter, names.join(", ")).into());
    };

    let frame = load_image(&input)?;
    let preset = load_preset(preset_path);

    let config = PipelineConfig {
        apply_filter: true,
        selected_filter: named,
        ..Default::default()
    };

    let pipeline = FramePipeline::new();
    let mut result = pipeline.transform(&frame, &config, &preset);
    if clamp {
        result = crop_centered(&result, frame.width(), frame.height());
    }

    let output = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        input.with_file_name(format!("{}_filtered.png", stem))
    });

    result
        .save(&output)
        .map_err(|e| format!("Failed to save {}: {}", output.display(), e))?;

    println!("Wrote {}", output.display());
    Ok(())
}

/// A file-backed frame source for the import path.
struct FileSource {
    frame: RgbaImage,
    preset: FilterPreset,
}

impl FrameSource for FileSource {
    fn current_frame(&self) -> Option<RgbaImage> {
        Some(self.frame.clone())
    }

    fn current_preset(&self) -> FilterPreset {
        self.preset
    }
}

/// Capture a still image into the gallery
pub fn capture(
    input: PathBuf,
    preset_path: Option<PathBuf>,
    root: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = FileSource {
        frame: load_image(&input)?,
        preset: load_preset(preset_path),
    };

    let mut gallery = open_gallery(root)?;
    let pipeline = FramePipeline::new();
    let config = PipelineConfig::default();

    let entry = capture_still(&source, &pipeline, &config, &mut gallery)?;
    println!(
        "Captured entry {} at position {} -> {}",
        entry.id,
        entry.index,
        entry.asset_path.display()
    );
    Ok(())
}

/// List gallery entries
pub fn gallery_list(root: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut gallery = open_gallery(root)?;
    let entries = gallery.entries();

    if entries.is_empty() {
        println!("Gallery is empty.");
        return Ok(());
    }

    println!("Gallery entries:");
    for (position, entry) in entries.iter().enumerate() {
        println!(
            "  [{}] index {}  id {}  {}",
            position,
            entry.index,
            entry.id,
            entry.asset_path.display()
        );
    }
    Ok(())
}

/// Remove one gallery entry by position
pub fn gallery_remove(
    root: Option<PathBuf>,
    position: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut gallery = open_gallery(root)?;
    match gallery.remove(position)? {
        Some(entry) => println!("Removed entry {} (asset left on disk)", entry.id),
        None => println!("No entry at position {}", position),
    }
    Ok(())
}

/// Clear the gallery
pub fn gallery_clear(root: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut gallery = open_gallery(root)?;
    let count = gallery.len();
    gallery.clear()?;
    println!("Removed {} entries (assets left on disk)", count);
    Ok(())
}

/// Write a neutral preset file
pub fn preset_init(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let output = match output {
        Some(path) => path,
        None => {
            let path = framesift::default_preset_path()
                .ok_or("Could not determine the application data directory")?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
    };

    FilterPreset::neutral().save_to(&output)?;
    println!("Wrote neutral preset to {}", output.display());
    Ok(())
}

/// Print the decoded contents of a preset file
pub fn preset_show(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match FilterPreset::load_from(&file) {
        Some(preset) => {
            println!("{:#?}", preset);
            Ok(())
        }
        None => Err(format!("Preset {} missing or unreadable", file.display()).into()),
    }
}
