// SPDX-License-Identifier: GPL-3.0-only

//! Captured frame gallery
//!
//! Captured frames persist as one PNG asset per entry plus a single JSON
//! index file listing every entry in order. The store mirrors the index in
//! memory and re-persists the full list after every mutation
//! (read-modify-write, not incremental).
//!
//! Persistence is deliberately forgiving on the read side: a missing or
//! corrupt index loads as an empty gallery. Write failures surface as errors
//! for that single call and leave prior state intact.

use crate::constants::{APP_DIR_NAME, ASSET_PREFIX, GALLERY_INDEX_FILE};
use crate::errors::{EngineResult, GalleryError};
use crate::preset::FilterPreset;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One captured frame: asset reference plus the preset frozen at capture
/// time. The preset is never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Unique entry id
    pub id: Uuid,
    /// Path of the PNG asset backing this entry
    pub asset_path: PathBuf,
    /// Position at append time, used as a cache key by UIs.
    ///
    /// Advisory only: removals do not renumber surviving entries, so after a
    /// removal the field can repeat between an old entry and a later append.
    pub index: usize,
    /// Filter parameters active when the frame was captured
    pub preset: FilterPreset,
}

/// Persisted collection of captured frames.
///
/// All mutations take `&mut self`, which is the single-writer discipline the
/// index file needs: concurrent writers would race the read-modify-write.
/// Share a store across threads behind a lock.
pub struct GalleryStore {
    root: PathBuf,
    entries: Vec<GalleryImage>,
    loaded: bool,
}

impl GalleryStore {
    /// Store rooted at `root`. Nothing is read until first use.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: Vec::new(),
            loaded: false,
        }
    }

    /// Store at the platform-default application-private location.
    pub fn open_default() -> Option<Self> {
        let root = dirs::data_dir()?.join(APP_DIR_NAME).join("gallery");
        Some(Self::new(root))
    }

    /// Gallery root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(GALLERY_INDEX_FILE)
    }

    fn ensure_root(&self) -> Result<(), GalleryError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| GalleryError::CreateRoot(self.root.clone(), e))
    }

    /// Read the index file into memory, replacing the in-memory mirror.
    ///
    /// A missing or unparseable index yields an empty gallery; no error
    /// reaches the caller.
    pub fn load(&mut self) {
        let path = self.index_path();
        self.entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Gallery index did not parse, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No gallery index, starting empty");
                Vec::new()
            }
        };
        self.loaded = true;
        debug!(count = self.entries.len(), "Gallery loaded");
    }

    fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.load();
        }
    }

    /// Entries in gallery order. Loads on first use.
    pub fn entries(&mut self) -> &[GalleryImage] {
        self.ensure_loaded();
        &self.entries
    }

    /// Number of entries. Loads on first use.
    pub fn len(&mut self) -> usize {
        self.ensure_loaded();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Persist the in-memory list to the index file.
    ///
    /// Writes a sibling temp file and renames it over the index.
    pub fn save(&self) -> EngineResult<()> {
        self.ensure_root()?;
        let path = self.index_path();
        let json = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| GalleryError::IndexEncode(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| GalleryError::IndexWrite(tmp.clone(), e))?;
        std::fs::rename(&tmp, &path).map_err(|e| GalleryError::IndexWrite(path.clone(), e))?;

        debug!(path = %path.display(), count = self.entries.len(), "Gallery index saved");
        Ok(())
    }

    /// Append a captured frame.
    ///
    /// Writes the PNG asset, records the entry with `index` equal to the
    /// current count, and persists the index. On any failure the store is
    /// left exactly as it was.
    pub fn append(
        &mut self,
        image: &RgbaImage,
        preset: FilterPreset,
    ) -> EngineResult<GalleryImage> {
        self.ensure_loaded();
        self.ensure_root()?;

        let id = Uuid::new_v4();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_{}_{}.png", ASSET_PREFIX, timestamp, id.simple());
        let asset_path = self.root.join(&filename);

        let mut buffer = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .map_err(|e| GalleryError::AssetEncode(e.to_string()))?;
        std::fs::write(&asset_path, &buffer)
            .map_err(|e| GalleryError::AssetWrite(asset_path.clone(), e))?;

        let entry = GalleryImage {
            id,
            asset_path,
            index: self.entries.len(),
            preset,
        };
        self.entries.push(entry.clone());

        if let Err(e) = self.save() {
            // Keep the store consistent with what is on disk.
            self.entries.pop();
            return Err(e);
        }

        info!(count = self.entries.len(), file = %filename, "Frame added to gallery");
        Ok(entry)
    }

    /// Remove the entry at `position` and re-persist.
    ///
    /// Surviving entries keep their original `index` values; there is no
    /// renumbering. The backing asset file is left on disk.
    pub fn remove(&mut self, position: usize) -> EngineResult<Option<GalleryImage>> {
        self.ensure_loaded();
        if position >= self.entries.len() {
            return Ok(None);
        }

        let removed = self.entries.remove(position);
        if let Err(e) = self.save() {
            self.entries.insert(position, removed);
            return Err(e);
        }

        info!(position, id = %removed.id, "Gallery entry removed");
        Ok(Some(removed))
    }

    /// Remove every entry and persist an empty index. Assets stay on disk.
    pub fn clear(&mut self) -> EngineResult<()> {
        self.ensure_loaded();
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.save() {
            self.entries = previous;
            return Err(e);
        }

        info!("Gallery cleared");
        Ok(())
    }
}
