//! Quest tree scanning.
//!
//! Walks the quest root and produces the nested [`QuestNode`] tree shown in the
//! sidebar, plus the flat file list that [`search`](crate::search) scores.
//!
//! ## Directory Structure
//!
//! ```text
//! metin2-quest-functions/        # Quest root
//! ├── .git/                      # Hidden, skipped
//! ├── README.md                  # File node "README"
//! ├── npc/                       # Directory node
//! │   ├── guards.md
//! │   └── shop-keeper.txt
//! └── scripts/
//!     ├── notes.md
//!     └── helper.lua             # Not a quest document, skipped
//! ```
//!
//! ## Ordering
//!
//! Within each directory, entries are sorted by `(is_file, lowercase name)`:
//! directories first, then files, each group alphabetical.
//!
//! ## Failure Modes
//!
//! A missing root is an empty tree. A subdirectory that cannot be read is
//! logged and shown as an empty directory; the rest of the tree still renders.
//!
//! ## Symlinks
//!
//! Symbolic links are never followed, neither here nor in the search walk or
//! the icon catalog, so a link cycle cannot recurse and every listed file is
//! also searchable.

use crate::naming::{self, QUEST_EXTENSIONS};
use crate::types::{NodeKind, QuestNode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Build the quest tree under `root`.
pub fn scan_tree(root: &Path) -> Vec<QuestNode> {
    if !root.is_dir() {
        debug!(root = %root.display(), "quest root missing, returning empty tree");
        return Vec::new();
    }
    scan_directory(root, root)
}

fn scan_directory(path: &Path, root: &Path) -> Vec<QuestNode> {
    let entries = match collect_entries(path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %path.display(), error = %err, "skipping unreadable quest directory");
            return Vec::new();
        }
    };

    let mut nodes = Vec::new();
    for entry in entries {
        let Some(rel) = naming::relative_path(&entry.path, root) else {
            continue;
        };
        if entry.is_dir {
            nodes.push(QuestNode {
                kind: NodeKind::Dir,
                name: entry.file_name,
                path: rel,
                children: scan_directory(&entry.path, root),
            });
        } else if naming::has_extension(&entry.path, QUEST_EXTENSIONS) {
            nodes.push(QuestNode {
                kind: NodeKind::File,
                name: naming::stem(&entry.path),
                path: rel,
                children: Vec::new(),
            });
        }
    }
    nodes
}

struct Entry {
    path: PathBuf,
    file_name: String,
    is_dir: bool,
}

/// Visible directories and regular files, in display order.
fn collect_entries(path: &Path) -> io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = fs::read_dir(path)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let file_name = e.file_name().to_string_lossy().to_string();
            if naming::is_hidden(&file_name) {
                return None;
            }
            // DirEntry::file_type does not traverse symlinks
            let file_type = e.file_type().ok()?;
            if !file_type.is_dir() && !file_type.is_file() {
                return None;
            }
            Some(Entry {
                path: e.path(),
                file_name,
                is_dir: file_type.is_dir(),
            })
        })
        .collect();

    entries.sort_by_cached_key(|e| (!e.is_dir, e.file_name.to_lowercase()));
    Ok(entries)
}

/// Every quest document under `root`, hidden ones included.
///
/// Unlike the tree, search reaches dot-prefixed files and directories.
/// Returned in walk order (sorted by file name per directory).
pub fn list_quest_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable quest entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && naming::has_extension(e.path(), QUEST_EXTENSIONS))
        .map(|e| e.into_path())
        .collect()
}

/// Count file nodes in a tree.
pub fn count_files(nodes: &[QuestNode]) -> usize {
    nodes
        .iter()
        .map(|n| {
            if n.is_dir() {
                count_files(&n.children)
            } else {
                1
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn names(nodes: &[QuestNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_tree(&tmp.path().join("nope")).is_empty());
        assert!(list_quest_files(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn directories_before_files_each_alphabetical() {
        let tmp = quest_fixture();
        let tree = scan_tree(tmp.path());

        assert_eq!(names(&tree), vec!["npc", "scripts", "Alpha", "readme"]);
        assert!(tree[0].is_dir());
        assert!(tree[1].is_dir());
        assert!(!tree[2].is_dir());
    }

    #[test]
    fn ordering_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.md", "");
        write_file(tmp.path(), "A.md", "");
        write_file(tmp.path(), "c.txt", "");

        let tree = scan_tree(tmp.path());
        assert_eq!(names(&tree), vec!["A", "b", "c"]);
    }

    #[test]
    fn hidden_and_foreign_files_excluded() {
        let tmp = quest_fixture();
        let tree = scan_tree(tmp.path());

        let all = flatten(&tree);
        assert!(all.iter().all(|n| !n.name.starts_with('.')));
        assert!(all.iter().all(|n| !n.path.contains(".git")));
        assert!(all.iter().all(|n| n.is_dir()
            || n.path.ends_with(".md")
            || n.path.ends_with(".txt")));
        assert!(!all.iter().any(|n| n.path.ends_with("helper.lua")));
    }

    #[test]
    fn nested_paths_are_relative_and_exist() {
        let tmp = quest_fixture();
        let tree = scan_tree(tmp.path());

        for node in flatten(&tree) {
            assert!(!node.path.starts_with('/'));
            assert!(tmp.path().join(&node.path).exists(), "{} missing", node.path);
        }

        let npc = &tree[0];
        assert_eq!(npc.path, "npc");
        assert_eq!(names(&npc.children), vec!["guards", "shop-keeper"]);
        assert_eq!(npc.children[0].path, "npc/guards.md");
    }

    #[test]
    fn file_names_drop_extension_but_paths_keep_it() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "quest.v2.md", "");

        let tree = scan_tree(tmp.path());
        assert_eq!(tree[0].name, "quest.v2");
        assert_eq!(tree[0].path, "quest.v2.md");
    }

    #[test]
    fn empty_directories_are_kept() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let tree = scan_tree(tmp.path());
        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_dir());
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn list_quest_files_includes_hidden_entries() {
        let tmp = quest_fixture();
        let files = list_quest_files(tmp.path());

        assert!(files.iter().all(|p| naming::has_extension(p, QUEST_EXTENSIONS)));
        assert!(files.iter().any(|p| p.ends_with(".git/secret.md")));
        assert!(files.iter().any(|p| p.ends_with(".hidden.md")));
        assert!(files.iter().any(|p| p.ends_with("npc/.draft.md")));
        // 5 visible + 3 hidden; cover.png and helper.lua are not documents
        assert_eq!(count_files(&scan_tree(tmp.path())), 5);
        assert_eq!(files.len(), 8);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_skipped_by_tree_and_search() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "real/guard.md", "captain");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("linked")).unwrap();

        let tree = scan_tree(tmp.path());
        assert_eq!(names(&tree), vec!["real"]);
        assert_eq!(count_files(&tree), 1);
        assert_eq!(list_quest_files(tmp.path()).len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a/quest.md", "");
        std::os::unix::fs::symlink(tmp.path().join("a"), tmp.path().join("a/loop")).unwrap();

        let tree = scan_tree(tmp.path());
        assert_eq!(tree.len(), 1);
        assert_eq!(names(&tree[0].children), vec!["quest"]);
        assert_eq!(flatten(&tree).len(), 2);
        assert_eq!(list_quest_files(tmp.path()).len(), 1);
    }
}
