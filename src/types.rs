//! Shared types returned by the query modules and serialized by the JSON API.
//!
//! Everything here is derived data: rebuilt from the filesystem on each request
//! (or, for [`ManifestGroup`], once per process) and never written back.

use serde::Serialize;
use std::collections::BTreeSet;

/// Kind of entry in the quest tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dir,
    File,
}

/// One entry in the quest tree.
#[derive(Debug, Clone, Serialize)]
pub struct QuestNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Directory name, or file stem for files
    pub name: String,
    /// Path relative to the quest root, `/`-separated
    pub path: String,
    /// Child entries; always empty for files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<QuestNode>,
}

impl QuestNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }
}

/// A ranked quest search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestSearchResult {
    pub path: String,
    pub name: String,
    /// +2 for a file name match, +1 for a content match
    pub score: u32,
    /// Excerpt around the first content match; empty for name-only matches
    pub snippet: String,
}

/// One logical icon, merged across its `.png` and `.tga` variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconRecord {
    /// File stem, also the manifest join key
    pub name: String,
    /// Relative directory of the chosen variant, empty at the root
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tga: Option<String>,
}

impl IconRecord {
    /// Path of the variant to display: the `.png` when present.
    pub fn display_path(&self) -> Option<&str> {
        self.png.as_deref().or(self.tga.as_deref())
    }
}

/// A normalized icon group from the manifest.
///
/// `items` and `prefix` are kept as options: an explicit but empty item list
/// is a different group from one that never declared items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestGroup {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<BTreeSet<String>>,
}

impl ManifestGroup {
    /// A group that only has an id; filtering falls back to the id heuristic.
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: id.to_string(),
            prefix: None,
            items: None,
        }
    }
}

/// One page of a filtered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub pages: usize,
}

impl<T> PageResult<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// The icon browser's response: one page of icons plus group metadata.
#[derive(Debug, Clone, Serialize)]
pub struct IconListing {
    #[serde(flatten)]
    pub page: PageResult<IconRecord>,
    pub groups: Vec<ManifestGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_group: Option<ManifestGroup>,
}
