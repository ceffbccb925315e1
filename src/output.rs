//! CLI output formatting for the non-serving commands.
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! Quests
//! npc/
//!     guards
//!         Source: npc/guards.md
//! readme
//!     Source: readme.txt
//!
//! 2 quest files
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 guards (score 3)
//!     Source: npc/guards.md
//!     ...Talk to the Captain at the gate...
//! ```
//!
//! ## Icons
//!
//! ```text
//! Books (page 1 of 1, 3 icons)
//! 001 27620 [png, tga]
//!     Source: item/27620.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::types::{IconListing, IconRecord, ManifestGroup, QuestNode, QuestSearchResult};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Tree
// ============================================================================

fn tree_lines(nodes: &[QuestNode], depth: usize, lines: &mut Vec<String>) {
    for node in nodes {
        if node.is_dir() {
            lines.push(format!("{}{}/", indent(depth), node.name));
            tree_lines(&node.children, depth + 1, lines);
        } else {
            lines.push(format!("{}{}", indent(depth), node.name));
            lines.push(format!("{}Source: {}", indent(depth + 1), node.path));
        }
    }
}

pub fn format_tree(nodes: &[QuestNode]) -> Vec<String> {
    let mut lines = vec!["Quests".to_string()];
    if nodes.is_empty() {
        lines.push(format!("{}(empty)", indent(1)));
        return lines;
    }
    tree_lines(nodes, 0, &mut lines);
    lines.push(String::new());
    lines.push(plural(crate::scan::count_files(nodes), "quest file"));
    lines
}

pub fn print_tree(nodes: &[QuestNode]) {
    print_lines(format_tree(nodes));
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search(query: &str, results: &[QuestSearchResult]) -> Vec<String> {
    if results.is_empty() {
        return vec![format!("No matches for {query:?}")];
    }
    let mut lines = Vec::new();
    for (i, r) in results.iter().enumerate() {
        lines.push(format!("{} {} (score {})", format_index(i + 1), r.name, r.score));
        lines.push(format!("{}Source: {}", indent(1), r.path));
        if !r.snippet.is_empty() {
            lines.push(format!("{}...{}...", indent(1), r.snippet));
        }
    }
    lines
}

pub fn print_search(query: &str, results: &[QuestSearchResult]) {
    print_lines(format_search(query, results));
}

// ============================================================================
// Icons
// ============================================================================

fn icon_formats(icon: &IconRecord) -> String {
    let formats: Vec<&str> = [("png", &icon.png), ("tga", &icon.tga)]
        .into_iter()
        .filter(|(_, path)| path.is_some())
        .map(|(ext, _)| ext)
        .collect();
    formats.join(", ")
}

pub fn format_icons(listing: &IconListing) -> Vec<String> {
    let page = &listing.page;
    let heading = listing
        .selected_group
        .as_ref()
        .map_or("All icons", |g| g.title.as_str());
    let mut lines = vec![format!(
        "{} (page {} of {}, {})",
        heading,
        page.page,
        page.pages,
        plural(page.total, "icon")
    )];

    let offset = (page.page - 1).saturating_mul(page.page_size);
    for (i, icon) in page.items.iter().enumerate() {
        lines.push(format!(
            "{} {} [{}]",
            format_index(offset + i + 1),
            icon.name,
            icon_formats(icon)
        ));
        if let Some(path) = icon.display_path() {
            lines.push(format!("{}Source: {}", indent(1), path));
        }
    }
    lines
}

pub fn print_icons(listing: &IconListing) {
    print_lines(format_icons(listing));
}

fn group_rule(group: &ManifestGroup) -> String {
    match (&group.items, group.prefix.as_deref()) {
        (Some(items), _) => plural(items.len(), "item"),
        (None, Some(prefix)) if !prefix.is_empty() => format!("prefix {prefix:?}"),
        _ => "by name".to_string(),
    }
}

pub fn format_groups(groups: &[ManifestGroup]) -> Vec<String> {
    if groups.is_empty() {
        return vec!["No icon groups".to_string()];
    }
    let mut lines = vec!["Groups".to_string()];
    for (i, group) in groups.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            group.title,
            group.id,
            group_rule(group)
        ));
    }
    lines
}

pub fn print_groups(groups: &[ManifestGroup]) {
    print_lines(format_groups(groups));
}
