//! Icon filtering and pagination.
//!
//! ## Group Membership
//!
//! A selected group decides membership by the first rule that applies:
//!
//! | Group has | Icon matches when |
//! |-----------|-------------------|
//! | no group selected | always |
//! | `items` (even empty) | its name is in the set, exactly |
//! | non-empty `prefix` | its name or folder starts with the prefix |
//! | neither | its name looks like `{id}_*`, `*_{id}_*` or `*_{id}` |
//!
//! The last rule is a compatibility heuristic for manifests that only name
//! groups. It trades precision for coverage: a group `ring` also claims
//! unrelated icons such as `gold_ring_box`. An explicitly empty prefix and an
//! absent prefix both fall through to it. A group id that is not in the
//! manifest at all is treated the same way.
//!
//! The text query and the folder filter are independent of the group and all
//! of them must pass.

use crate::types::{IconListing, IconRecord, ManifestGroup, PageResult};
use serde::Deserialize;

/// Default number of icons per page.
pub const DEFAULT_PAGE_SIZE: usize = 60;

/// Icon browser query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IconQuery {
    /// Selected group id
    pub group: Option<String>,
    /// Case-insensitive substring of the icon name
    pub q: Option<String>,
    /// Folder prefix
    pub folder: Option<String>,
    /// 1-based page; anything below 1 is clamped
    pub page: Option<i64>,
}

impl IconQuery {
    fn group_id(&self) -> Option<&str> {
        non_blank(self.group.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Whether `icon` belongs to `group`.
pub fn group_matches(group: &ManifestGroup, icon: &IconRecord) -> bool {
    if let Some(items) = &group.items {
        return items.contains(&icon.name);
    }
    match group.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => {
            icon.name.starts_with(prefix) || icon.folder.starts_with(prefix)
        }
        _ => id_heuristic(&group.id, &icon.name),
    }
}

fn id_heuristic(id: &str, name: &str) -> bool {
    name.starts_with(&format!("{id}_"))
        || name.contains(&format!("_{id}_"))
        || name.ends_with(&format!("_{id}"))
}

/// Apply group, text, and folder filters, preserving catalog order.
pub fn filter_icons(
    icons: Vec<IconRecord>,
    group: Option<&ManifestGroup>,
    text: Option<&str>,
    folder: Option<&str>,
) -> Vec<IconRecord> {
    let needle = non_blank(text).map(str::to_lowercase);
    let folder = non_blank(folder).map(crate::naming::normalize_prefix);

    icons
        .into_iter()
        .filter(|icon| group.is_none_or(|g| group_matches(g, icon)))
        .filter(|icon| {
            needle
                .as_deref()
                .is_none_or(|n| icon.name.to_lowercase().contains(n))
        })
        .filter(|icon| folder.as_deref().is_none_or(|f| icon.folder.starts_with(f)))
        .collect()
}

/// Slice one page out of `items`.
///
/// Pages are 1-based; `page < 1` is clamped to 1 and a page past the end is
/// empty with valid metadata. `pages` is at least 1, even for no items.
pub fn paginate<T: Clone>(items: &[T], page: i64, page_size: usize) -> PageResult<T> {
    let page_size = page_size.max(1);
    let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
    let total = items.len();
    let pages = total.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size);
    let page_items = if start < total {
        let end = start.saturating_add(page_size).min(total);
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    PageResult {
        items: page_items,
        page,
        page_size,
        total,
        pages,
    }
}

/// Resolve the selected group, filter the catalog, and paginate.
pub fn list_icons(
    icons: Vec<IconRecord>,
    groups: &[ManifestGroup],
    query: &IconQuery,
    page_size: usize,
) -> IconListing {
    let selected = query.group_id().map(|id| {
        groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .unwrap_or_else(|| ManifestGroup::bare(id))
    });

    let filtered = filter_icons(
        icons,
        selected.as_ref(),
        query.q.as_deref(),
        query.folder.as_deref(),
    );
    let page = paginate(&filtered, query.page.unwrap_or(1), page_size);

    IconListing {
        page,
        groups: groups.to_vec(),
        selected_group: selected,
    }
}
