//! Icon group manifest loading.
//!
//! `manifest.json` at the icon root classifies icons into groups, but its
//! schema is not fixed. The loader is a best-effort adapter from whatever shape
//! it finds to [`ManifestGroup`]s, and never fails: an unreadable or malformed
//! manifest is logged and treated as "no groups", which leaves the icon browser
//! usable without classification.
//!
//! ## Accepted Shapes
//!
//! ```json
//! { "books": { "items": ["27620.png"] }, "armor": { "prefix": "item/armor" } }
//! [ { "id": "books", "title": { "en": "Books" }, "icons": ["27620"] } ]
//! { "groups": [ ... ] }                       // also "folders" / "categories"
//! { "books": ["27620", "27621"], "skills": "icon/skill" }
//! ```
//!
//! In a mapping, number, bool and null values are metadata and never become
//! groups.
//!
//! ## Extraction Rules
//!
//! Each group is normalized by the first rule that applies:
//!
//! 1. An `items` / `icons` / `files` collection becomes the item set. Entries are
//!    reduced to icon stems (`items/27620.png` → `27620`).
//! 2. Otherwise a `prefix` / `path` / `folder` / `dir` string becomes the prefix.
//! 3. Otherwise the group keeps only its id and title.
//!
//! An explicitly empty prefix (`"prefix": ""`) is kept as `Some("")`, distinct
//! from an absent one, so the difference stays visible in the JSON API.
//!
//! ## Titles
//!
//! Localized titles win: a mapping under `i18n` / `locales` / `translations` /
//! `titles` / `names`, or a `title` / `name` / `label` given as an object. From
//! that mapping the configured locale is used, else the first string entry in
//! key order. Then a plain `title` / `name` / `label` string, then the id.
//!
//! ## Caching
//!
//! [`ManifestCache`] loads once per process on first use and is never
//! invalidated. Editing `manifest.json` requires a restart.

use crate::naming;
use crate::types::ManifestGroup;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected manifest top-level type: {0}")]
    Shape(&'static str),
}

const WRAPPER_KEYS: &[&str] = &["groups", "folders", "categories"];
const ID_KEYS: &[&str] = &["id", "key", "slug", "name"];
const ITEM_KEYS: &[&str] = &["items", "icons", "files"];
const PREFIX_KEYS: &[&str] = &["prefix", "path", "folder", "dir"];
const TITLE_KEYS: &[&str] = &["title", "name", "label"];
const LOCALIZED_KEYS: &[&str] = &["i18n", "locales", "translations", "titles", "names"];

/// Parse manifest text into normalized, de-duplicated, title-sorted groups.
pub fn parse_manifest(text: &str, locale: &str) -> Result<Vec<ManifestGroup>, ManifestError> {
    let value: Value = serde_json::from_str(text)?;
    let candidates = candidates(&value)?;

    let mut seen = HashSet::new();
    let mut groups: Vec<ManifestGroup> = candidates
        .into_iter()
        .filter_map(|c| c.normalize(locale))
        .filter(|g| seen.insert(g.id.clone()))
        .collect();
    groups.sort_by_cached_key(|g| (g.title.to_lowercase(), g.id.clone()));
    Ok(groups)
}

/// Load groups from `path`. Any failure is logged and yields no groups.
pub fn load_manifest(path: &Path, locale: &str) -> Vec<ManifestGroup> {
    if !path.is_file() {
        info!(path = %path.display(), "no icon manifest, groups disabled");
        return Vec::new();
    }
    let result = fs::read_to_string(path)
        .map_err(ManifestError::from)
        .and_then(|text| parse_manifest(&text, locale));
    match result {
        Ok(groups) => {
            info!(path = %path.display(), groups = groups.len(), "loaded icon manifest");
            groups
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unusable icon manifest");
            Vec::new()
        }
    }
}

/// Process-lifetime manifest cache with exactly-once population.
///
/// Concurrent first callers block on the same initialization; readers only
/// ever see the fully built list.
#[derive(Debug)]
pub struct ManifestCache {
    path: PathBuf,
    locale: String,
    groups: OnceLock<Arc<Vec<ManifestGroup>>>,
}

impl ManifestCache {
    pub fn new(path: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            locale: locale.into(),
            groups: OnceLock::new(),
        }
    }

    /// Cached groups, loading them on the first call.
    pub fn groups(&self) -> Arc<Vec<ManifestGroup>> {
        self.groups
            .get_or_init(|| Arc::new(load_manifest(&self.path, &self.locale)))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.groups.get().is_some()
    }
}

// =============================================================================
// Shape detection
// =============================================================================

/// A raw group before normalization.
enum Candidate<'a> {
    /// Entry of an `id → value` mapping
    Keyed(&'a str, &'a Value),
    /// Element of a list of groups
    Listed(&'a Value),
}

fn candidates(value: &Value) -> Result<Vec<Candidate<'_>>, ManifestError> {
    match value {
        Value::Object(map) => {
            if let Some(inner) = wrapped_groups(map) {
                return candidates(inner);
            }
            Ok(map.iter().map(|(k, v)| Candidate::Keyed(k, v)).collect())
        }
        Value::Array(list) => Ok(list.iter().map(Candidate::Listed).collect()),
        Value::Null => Err(ManifestError::Shape("null")),
        Value::Bool(_) => Err(ManifestError::Shape("bool")),
        Value::Number(_) => Err(ManifestError::Shape("number")),
        Value::String(_) => Err(ManifestError::Shape("string")),
    }
}

/// The groups container if `map` is a wrapper like `{"groups": [...]}`.
///
/// An object under a wrapper key only counts if it does not itself look like
/// a group, so a flat mapping with a group called `groups` still works.
fn wrapped_groups(map: &Map<String, Value>) -> Option<&Value> {
    WRAPPER_KEYS.iter().find_map(|key| {
        let value = map.get(*key)?;
        match value {
            Value::Array(_) => Some(value),
            Value::Object(inner) if !looks_like_group(inner) => Some(value),
            _ => None,
        }
    })
}

fn looks_like_group(map: &Map<String, Value>) -> bool {
    [ITEM_KEYS, PREFIX_KEYS, TITLE_KEYS, LOCALIZED_KEYS]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|k| map.contains_key(*k))
}

// =============================================================================
// Normalization
// =============================================================================

impl Candidate<'_> {
    fn normalize(&self, locale: &str) -> Option<ManifestGroup> {
        match self {
            Candidate::Keyed(id, Value::Object(obj)) => from_object(Some(*id), obj, locale),
            Candidate::Keyed(id, Value::Array(list)) => {
                let id = clean_id(id)?;
                Some(ManifestGroup {
                    title: id.clone(),
                    id,
                    prefix: None,
                    items: Some(item_set(list)),
                })
            }
            Candidate::Keyed(id, Value::String(prefix)) => {
                let id = clean_id(id)?;
                Some(ManifestGroup {
                    title: id.clone(),
                    id,
                    prefix: Some(naming::normalize_prefix(prefix)),
                    items: None,
                })
            }
            // metadata such as `"version": 2`, not a group
            Candidate::Keyed(_, Value::Number(_) | Value::Bool(_) | Value::Null) => None,
            Candidate::Listed(Value::Object(obj)) => from_object(None, obj, locale),
            Candidate::Listed(Value::String(id)) => clean_id(id).map(|id| ManifestGroup::bare(&id)),
            Candidate::Listed(_) => None,
        }
    }
}

fn from_object(
    id_hint: Option<&str>,
    obj: &Map<String, Value>,
    locale: &str,
) -> Option<ManifestGroup> {
    let id = match id_hint {
        Some(id) => clean_id(id)?,
        None => ID_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(scalar_string))
            .and_then(|id| clean_id(&id))?,
    };

    let items = ITEM_KEYS.iter().find_map(|k| match obj.get(*k)? {
        Value::Array(list) => Some(item_set(list)),
        Value::Object(map) => Some(
            map.keys()
                .map(|k| naming::normalize_item_name(k))
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        _ => None,
    });

    let prefix = if items.is_none() {
        PREFIX_KEYS
            .iter()
            .find_map(|k| obj.get(*k)?.as_str())
            .map(naming::normalize_prefix)
    } else {
        None
    };

    let title = resolve_title(obj, locale).unwrap_or_else(|| id.clone());

    Some(ManifestGroup {
        id,
        title,
        prefix,
        items,
    })
}

fn resolve_title(obj: &Map<String, Value>, locale: &str) -> Option<String> {
    let localized = LOCALIZED_KEYS
        .iter()
        .chain(TITLE_KEYS)
        .filter_map(|k| obj.get(*k)?.as_object())
        .find_map(|map| pick_locale(map, locale));
    if localized.is_some() {
        return localized;
    }
    TITLE_KEYS
        .iter()
        .filter_map(|k| obj.get(*k)?.as_str())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn pick_locale(map: &Map<String, Value>, locale: &str) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    map.get(locale)
        .and_then(non_empty)
        .or_else(|| map.values().find_map(non_empty))
}

fn item_set(list: &[Value]) -> BTreeSet<String> {
    list.iter()
        .filter_map(scalar_string)
        .map(|s| naming::normalize_item_name(&s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strings as-is, numbers rendered (`27620` and `"27620"` are the same icon).
fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn clean_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> Vec<ManifestGroup> {
        parse_manifest(text, "en").unwrap()
    }

    fn set(items: &[&str]) -> Option<BTreeSet<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn explicit_items_are_normalized_to_stems() {
        let groups = parse(r#"{"books": {"items": ["27620.png"]}}"#);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "books");
        assert_eq!(groups[0].title, "books");
        assert_eq!(groups[0].items, set(&["27620"]));
        assert_eq!(groups[0].prefix, None);
    }

    #[test]
    fn list_of_group_objects() {
        let groups = parse(
            r#"[
                {"id": "weapons", "title": "Weapons", "icons": ["sword.tga", 101]},
                {"key": "armor", "label": "Armor", "path": "item/armor/"}
            ]"#,
        );
        let armor = find_group(&groups, "armor");
        assert_eq!(armor.title, "Armor");
        assert_eq!(armor.prefix.as_deref(), Some("item/armor"));
        assert_eq!(armor.items, None);

        let weapons = find_group(&groups, "weapons");
        assert_eq!(weapons.items, set(&["sword", "101"]));
    }

    #[test]
    fn wrapper_key_is_unwrapped() {
        let groups = parse(r#"{"version": 2, "groups": [{"id": "a"}, {"id": "b"}]}"#);
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn group_named_like_a_wrapper_is_still_a_group() {
        let groups = parse(r#"{"folders": {"prefix": "icon/folder"}}"#);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "folders");
        assert_eq!(groups[0].prefix.as_deref(), Some("icon/folder"));
    }

    #[test]
    fn shorthand_values() {
        let groups = parse(r#"{"potions": ["27001", "27002.png"], "skills": "./icon/skill"}"#);
        assert_eq!(find_group(&groups, "potions").items, set(&["27001", "27002"]));
        assert_eq!(
            find_group(&groups, "skills").prefix.as_deref(),
            Some("icon/skill")
        );
    }

    #[test]
    fn items_take_priority_over_prefix() {
        let groups = parse(r#"{"g": {"items": ["a"], "prefix": "item"}}"#);
        assert_eq!(groups[0].items, set(&["a"]));
        assert_eq!(groups[0].prefix, None);
    }

    #[test]
    fn items_given_as_mapping_use_keys() {
        let groups = parse(r#"{"g": {"icons": {"27620.png": {"note": "x"}, "27621": true}}}"#);
        assert_eq!(groups[0].items, set(&["27620", "27621"]));
    }

    #[test]
    fn empty_items_and_prefix_states_are_distinct() {
        let groups = parse(
            r#"{
                "explicit_empty": {"items": []},
                "no_fields": {"title": "Nothing"},
                "blank_prefix": {"prefix": ""}
            }"#,
        );
        let explicit = find_group(&groups, "explicit_empty");
        assert_eq!(explicit.items, Some(BTreeSet::new()));

        let bare = find_group(&groups, "no_fields");
        assert_eq!(bare.items, None);
        assert_eq!(bare.prefix, None);

        let blank = find_group(&groups, "blank_prefix");
        assert_eq!(blank.items, None);
        assert_eq!(blank.prefix.as_deref(), Some(""));
    }

    #[test]
    fn preferred_locale_wins() {
        let groups = parse(
            r#"{"books": {"title": "Plain", "i18n": {"de": "Bücher", "en": "Books"}}}"#,
        );
        assert_eq!(groups[0].title, "Books");
    }

    #[test]
    fn any_string_locale_used_when_preferred_missing() {
        let groups = parse(r#"{"books": {"name": {"ru": "Книги", "pl": 5}}}"#);
        assert_eq!(groups[0].title, "Книги");
    }

    #[test]
    fn configured_locale_is_respected() {
        let groups = parse_manifest(
            r#"{"books": {"titles": {"en": "Books", "ro": "Cărți"}}}"#,
            "ro",
        )
        .unwrap();
        assert_eq!(groups[0].title, "Cărți");
    }

    #[test]
    fn title_falls_back_to_id() {
        let groups = parse(r#"{"misc": {"items": []}}"#);
        assert_eq!(groups[0].title, "misc");
    }

    #[test]
    fn duplicate_ids_first_wins() {
        let groups = parse(r#"[{"id": "a", "title": "First"}, {"id": "a", "title": "Second"}]"#);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "First");
    }

    #[test]
    fn groups_sorted_by_title() {
        let groups = parse(
            r#"[{"id": "1", "title": "zeta"}, {"id": "2", "title": "Alpha"}, {"id": "3", "title": "beta"}]"#,
        );
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn entries_without_ids_are_skipped() {
        let groups = parse(r#"[{"title": "No id"}, 42, null, "plain", {"id": "  "}]"#);
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["plain"]);
    }

    #[test]
    fn scalar_values_in_mapping_are_not_groups() {
        let groups = parse(
            r#"{"version": 2, "generated": true, "author": null, "books": {"items": ["27620"]}}"#,
        );
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["books"]);
    }

    #[test]
    fn bad_top_level_is_shape_error() {
        assert!(matches!(
            parse_manifest("42", "en"),
            Err(ManifestError::Shape("number"))
        ));
        assert!(matches!(
            parse_manifest("not json", "en"),
            Err(ManifestError::Json(_))
        ));
    }

    #[test]
    fn load_never_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(load_manifest(&tmp.path().join("manifest.json"), "en").is_empty());

        write_file(tmp.path(), "manifest.json", "{ broken");
        assert!(load_manifest(&tmp.path().join("manifest.json"), "en").is_empty());

        write_file(tmp.path(), "manifest.json", "\"just a string\"");
        assert!(load_manifest(&tmp.path().join("manifest.json"), "en").is_empty());
    }

    #[test]
    fn cache_loads_once_and_ignores_later_edits() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        write_file(tmp.path(), "manifest.json", r#"{"books": {"items": ["1"]}}"#);

        let cache = ManifestCache::new(&path, "en");
        assert!(!cache.is_loaded());
        assert_eq!(cache.groups().len(), 1);
        assert!(cache.is_loaded());

        write_file(tmp.path(), "manifest.json", r#"{"a": {}, "b": {}, "c": {}}"#);
        assert_eq!(cache.groups().len(), 1);
        assert!(Arc::ptr_eq(&cache.groups(), &cache.groups()));
    }

    #[test]
    fn cache_populates_once_under_concurrency() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        write_file(tmp.path(), "manifest.json", r#"{"books": {"items": ["1"]}}"#);
        let cache = Arc::new(ManifestCache::new(&path, "en"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.groups())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.iter().all(|g| Arc::ptr_eq(g, &results[0])));
    }
}
