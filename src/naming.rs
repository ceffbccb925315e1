//! Centralized file naming and relative-path handling.
//!
//! Both content sources identify entries by names derived from the filesystem:
//!
//! - **Quest files** are identified by their path relative to the quest root
//!   (`npc/guards/captain.md`) and displayed by their stem (`captain`).
//! - **Icons** are identified by their stem alone (`27620.png` → `27620`),
//!   which is also the join key against the manifest.
//!
//! Relative paths are always rendered with `/` separators so they are stable
//! across platforms and can be used directly in URLs.
//!
//! ## Resolving user-supplied paths
//!
//! Handlers receive relative paths from query strings and URL segments.
//! [`resolve_under`] is the only way those are turned back into filesystem
//! paths. Leading `/` characters are stripped, so `/npc/guard.md` means
//! `npc/guard.md` under the root; a `..` component or a drive prefix is
//! rejected.

use std::path::{Component, Path, PathBuf};

/// Extensions recognized as quest documents.
pub const QUEST_EXTENSIONS: &[&str] = &["md", "txt"];

/// Primary icon format (browser-displayable).
pub const PRIMARY_ICON_EXTENSION: &str = "png";

/// Secondary icon format (game-native, served as a download).
pub const SECONDARY_ICON_EXTENSION: &str = "tga";

/// Whether a name is hidden (dot-prefixed): left out of the tree and the icon catalog.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Lowercased extension of a path, empty if it has none.
pub fn extension_lower(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Whether the path carries one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = extension_lower(path);
    extensions.contains(&ext.as_str())
}

/// File name without its final extension.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Normalize a manifest item entry to an icon stem.
///
/// Manifest authors refer to icons inconsistently: bare stems, file names,
/// or relative paths. All of these collapse to the stem:
/// - `"27620"` → `"27620"`
/// - `"27620.png"` → `"27620"`
/// - `"items/27620.TGA"` → `"27620"`
/// - `"notes.txt"` → `"notes.txt"` (unknown extensions are part of the name)
pub fn normalize_item_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let file_name = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    if let Some((base, ext)) = file_name.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        if ext == PRIMARY_ICON_EXTENSION || ext == SECONDARY_ICON_EXTENSION {
            return base.to_string();
        }
    }
    file_name.to_string()
}

/// Normalize a folder-like prefix: `/` separators, no leading `./` or `/`,
/// no trailing `/`.
pub fn normalize_prefix(raw: &str) -> String {
    let unified = raw.trim().replace('\\', "/");
    let mut s = unified.as_str();
    while let Some(rest) = s.strip_prefix("./") {
        s = rest;
    }
    s.trim_matches('/').to_string()
}

/// Render `path` relative to `root` with `/` separators.
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

/// Resolve a user-supplied relative path under `root`.
///
/// Leading `/` characters are stripped and `\` is read as `/`. After that only
/// plain (`Normal`) components and `.` are accepted. Returns `None` for empty
/// paths, any `..` component and drive prefixes, so the result always stays
/// inside `root`. Existence is not checked.
pub fn resolve_under(root: &Path, rel: &str) -> Option<PathBuf> {
    let rel = rel.replace('\\', "/");
    let rel = Path::new(rel.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    let mut pushed = false;
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    pushed.then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_names() {
        assert!(is_hidden(".git"));
        assert!(is_hidden(".draft.md"));
        assert!(!is_hidden("guards.md"));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension(Path::new("a/B.MD"), QUEST_EXTENSIONS));
        assert!(has_extension(Path::new("notes.txt"), QUEST_EXTENSIONS));
        assert!(!has_extension(Path::new("script.lua"), QUEST_EXTENSIONS));
        assert!(!has_extension(Path::new("README"), QUEST_EXTENSIONS));
    }

    #[test]
    fn stem_strips_last_extension_only() {
        assert_eq!(stem(Path::new("dir/27620.png")), "27620");
        assert_eq!(stem(Path::new("quest.v2.md")), "quest.v2");
    }

    #[test]
    fn item_names_collapse_to_stems() {
        assert_eq!(normalize_item_name("27620"), "27620");
        assert_eq!(normalize_item_name("27620.png"), "27620");
        assert_eq!(normalize_item_name("items/27620.TGA"), "27620");
        assert_eq!(normalize_item_name(" icon\\skill\\fire.png "), "fire");
        assert_eq!(normalize_item_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn prefixes_are_normalized() {
        assert_eq!(normalize_prefix("./item/"), "item");
        assert_eq!(normalize_prefix("/icon\\skill"), "icon/skill");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/data/quests");
        let file = root.join("npc").join("guard.md");
        assert_eq!(relative_path(&file, root).as_deref(), Some("npc/guard.md"));
        assert_eq!(relative_path(Path::new("/elsewhere/x.md"), root), None);
    }

    #[test]
    fn resolve_accepts_plain_relative_paths() {
        let root = Path::new("/data/quests");
        assert_eq!(
            resolve_under(root, "npc/guard.md"),
            Some(root.join("npc").join("guard.md"))
        );
        assert_eq!(
            resolve_under(root, "./npc/guard.md"),
            Some(root.join("npc").join("guard.md"))
        );
    }

    #[test]
    fn resolve_rejects_escapes() {
        let root = Path::new("/data/quests");
        assert_eq!(resolve_under(root, "../secret.md"), None);
        assert_eq!(resolve_under(root, "npc/../../secret.md"), None);
        assert_eq!(resolve_under(root, ""), None);
        assert_eq!(resolve_under(root, "."), None);
    }

    #[test]
    fn resolve_treats_leading_slash_as_relative() {
        let root = Path::new("/data/quests");
        assert_eq!(resolve_under(root, "/guard.md"), Some(root.join("guard.md")));
    }
}
