//! Icon catalog building and raw icon access.
//!
//! The icon repository stores each icon in up to two formats: a `.png` that
//! browsers can display and the game-native `.tga`. Both are keyed by their
//! stem, so `27620.png` and `27620.tga` become a single [`IconRecord`].
//!
//! ## Folder Resolution
//!
//! When both variants exist in different directories, the record's folder is
//! the `.png`'s folder; the `.tga`'s folder is used only when there is no
//! `.png`. If the same stem appears twice in one format, the first file in
//! walk order (sorted by file name per directory, depth-first) wins and the
//! duplicate is logged.

use crate::naming::{self, PRIMARY_ICON_EXTENSION, SECONDARY_ICON_EXTENSION};
use crate::types::IconRecord;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("Icon not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A located variant: relative file path and its relative folder.
#[derive(Debug, Clone)]
struct Located {
    path: String,
    folder: String,
}

#[derive(Debug, Default)]
struct Variants {
    png: Option<Located>,
    tga: Option<Located>,
}

impl Variants {
    fn into_record(self, name: String) -> Option<IconRecord> {
        let folder = self.png.as_ref().or(self.tga.as_ref())?.folder.clone();
        Some(IconRecord {
            name,
            folder,
            png: self.png.map(|l| l.path),
            tga: self.tga.map(|l| l.path),
        })
    }
}

/// Scan `root` and merge every `.png` / `.tga` into one record per stem.
///
/// A missing root yields an empty catalog. Symlinks are not followed. Records
/// are sorted by lowercase name, ties broken by the exact name.
pub fn build_catalog(root: &Path) -> Vec<IconRecord> {
    if !root.is_dir() {
        debug!(root = %root.display(), "icon root missing, returning empty catalog");
        return Vec::new();
    }

    let mut by_stem: HashMap<String, Variants> = HashMap::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !naming::is_hidden(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable icon entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = naming::extension_lower(entry.path());
        if ext != PRIMARY_ICON_EXTENSION && ext != SECONDARY_ICON_EXTENSION {
            continue;
        }
        let Some(path) = naming::relative_path(entry.path(), root) else {
            continue;
        };
        let folder = entry
            .path()
            .parent()
            .and_then(|p| naming::relative_path(p, root))
            .unwrap_or_default();

        let stem = naming::stem(entry.path());
        let variants = by_stem.entry(stem).or_default();
        let slot = if ext == PRIMARY_ICON_EXTENSION {
            &mut variants.png
        } else {
            &mut variants.tga
        };
        if let Some(existing) = slot.as_ref() {
            debug!(kept = %existing.path, ignored = %path, "duplicate icon stem");
        } else {
            *slot = Some(Located { path, folder });
        }
    }

    let mut icons: Vec<IconRecord> = by_stem
        .into_iter()
        .filter_map(|(name, variants)| variants.into_record(name))
        .collect();
    icons.sort_by_cached_key(|i| (i.name.to_lowercase(), i.name.clone()));
    icons
}

/// Raw icon bytes with the content type to serve them as.
#[derive(Debug)]
pub struct IconFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Content type by extension: `.png` is an image, everything else is opaque.
pub fn content_type_for(path: &Path) -> &'static str {
    if naming::extension_lower(path) == PRIMARY_ICON_EXTENSION {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

/// Read the file at `rel` under the icon root.
pub fn read_icon(root: &Path, rel: &str) -> Result<IconFile, IconError> {
    let path = naming::resolve_under(root, rel)
        .filter(|p| p.is_file())
        .ok_or_else(|| IconError::NotFound(rel.to_string()))?;
    let bytes = fs::read(&path)?;
    Ok(IconFile {
        bytes,
        content_type: content_type_for(&path),
    })
}
