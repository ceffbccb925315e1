//! Shared test utilities.
//!
//! Fixtures are built in a fresh `TempDir` per test so tests can mutate them
//! freely. The quest fixture looks like:
//!
//! ```text
//! .git/secret.md          # hidden: not in the tree, still searched
//! .hidden.md              # hidden
//! Alpha.md
//! readme.txt
//! cover.png               # not a quest document
//! npc/
//!   guards.md             # mentions the captain
//!   shop-keeper.txt
//!   .draft.md             # hidden
//! scripts/
//!   notes.md
//!   helper.lua            # not a quest document
//! ```
//!
//! The icon fixture has merged variants, a tga-only icon, a manifest, and
//! files that must be ignored.

use std::path::Path;
use tempfile::TempDir;

use crate::types::{IconRecord, ManifestGroup, QuestNode};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `content` to `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn quest_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, ".git/secret.md", "secret internals");
    write_file(root, ".hidden.md", "secret notes");
    write_file(root, "Alpha.md", "# Alpha\n\nFirst quest.");
    write_file(root, "readme.txt", "Quest function reference.");
    write_file(root, "cover.png", "not text");
    write_file(
        root,
        "npc/guards.md",
        "# Guards\n\nTalk to the Captain at the gate.\n",
    );
    write_file(root, "npc/shop-keeper.txt", "Sells potions.");
    write_file(root, "npc/.draft.md", "secret draft");
    write_file(root, "scripts/notes.md", "## Notes\n\n- when login begin");
    write_file(root, "scripts/helper.lua", "-- captain helper");
    tmp
}

pub fn icon_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "manifest.json", r#"{"books": {"items": ["27620.png"]}}"#);
    write_file(root, "item/27620.png", "png");
    write_file(root, "item/27620.tga", "tga");
    write_file(root, "item/books_27621.png", "png");
    write_file(root, "item/old_books.png", "png");
    write_file(root, "icon/skill/fire_books.tga", "tga");
    write_file(root, "item/cache.db", "not an icon");
    write_file(root, ".thumbs/hidden.png", "png");
    tmp
}

/// Build an icon record with a `.png` variant in `folder`.
pub fn icon(name: &str, folder: &str) -> IconRecord {
    let path = if folder.is_empty() {
        format!("{name}.png")
    } else {
        format!("{folder}/{name}.png")
    };
    IconRecord {
        name: name.to_string(),
        folder: folder.to_string(),
        png: Some(path),
        tga: None,
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a group by id. Panics if not found.
pub fn find_group<'a>(groups: &'a [ManifestGroup], id: &str) -> &'a ManifestGroup {
    groups.iter().find(|g| g.id == id).unwrap_or_else(|| {
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        panic!("group '{id}' not found. Available: {ids:?}")
    })
}

/// Every node in a tree, depth-first.
pub fn flatten(nodes: &[QuestNode]) -> Vec<&QuestNode> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node);
        out.extend(flatten(&node.children));
    }
    out
}
