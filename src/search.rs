//! Quest full-text search.
//!
//! A deliberately simple linear scan: every quest document is read and scored
//! against a lowercase substring query.
//!
//! | Match | Score |
//! |-------|-------|
//! | query in file stem | +2 |
//! | query in file content | +1 |
//!
//! Files are scored in parallel with rayon; the final order is fully determined
//! by the sort `(score desc, lowercase name asc, path asc)`, so results are
//! identical to a sequential scan.
//!
//! Every `.md`/`.txt` file under the root is scanned, including dot-prefixed
//! files and directories that the tree hides. Symlinks are not followed.
//!
//! Content is decoded lossily. A file that cannot be decoded or read never
//! aborts the search, it just cannot score a content match.

use crate::naming;
use crate::scan;
use crate::types::QuestSearchResult;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default maximum number of results.
pub const DEFAULT_LIMIT: usize = 50;

/// Characters kept on each side of the match offset in a snippet.
const SNIPPET_RADIUS: usize = 40;

/// Search every quest document under `root` for `query`.
///
/// An empty (or whitespace-only) query returns no results without scanning.
pub fn search(root: &Path, query: &str, limit: usize) -> Vec<QuestSearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let files = scan::list_quest_files(root);
    let mut results: Vec<QuestSearchResult> = files
        .par_iter()
        .filter_map(|path| score_file(path, root, &needle))
        .collect();

    results.sort_by_cached_key(|r| (std::cmp::Reverse(r.score), r.name.to_lowercase(), r.path.clone()));
    results.truncate(limit);
    debug!(query = %needle, hits = results.len(), scanned = files.len(), "quest search");
    results
}

fn score_file(path: &Path, root: &Path, needle: &str) -> Option<QuestSearchResult> {
    let rel = naming::relative_path(path, root)?;
    let name = naming::stem(path);

    let mut score = 0;
    if name.to_lowercase().contains(needle) {
        score += 2;
    }

    let text = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "unreadable quest file");
            String::new()
        }
    };

    let snippet = match find_char_offset(&text, needle) {
        Some(offset) => {
            score += 1;
            snippet_at(&text, offset)
        }
        None => String::new(),
    };

    (score > 0).then_some(QuestSearchResult {
        path: rel,
        name,
        score,
        snippet,
    })
}

/// Character offset of the first case-insensitive occurrence of `needle`.
///
/// The offset is measured in the lowercased text; lowercasing preserves the
/// character count for everything except a handful of special cases, where
/// the snippet window may shift by a character or two.
fn find_char_offset(text: &str, needle: &str) -> Option<usize> {
    let lowered = text.to_lowercase();
    let byte_idx = lowered.find(needle)?;
    Some(lowered[..byte_idx].chars().count())
}

/// Up to [`SNIPPET_RADIUS`] characters either side of `offset`, newlines as spaces.
fn snippet_at(text: &str, offset: usize) -> String {
    let start = offset.saturating_sub(SNIPPET_RADIUS);
    let end = offset + SNIPPET_RADIUS;
    text.chars()
        .skip(start)
        .take(end - start)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
