//! # m2-tools-ui
//!
//! A read-only local browser for two content repositories: a tree of quest
//! documentation files and a catalog of game icons. The filesystem is the
//! data source; nothing is ever written back.
//!
//! # Architecture: Query Modules Behind a Thin Server
//!
//! Every request is answered by re-reading the repositories, so edits on disk
//! show up on the next page load:
//!
//! ```text
//! quest root  →  scan / render / search  →  tree, HTML, ranked hits
//! icon root   →  icons + manifest        →  catalog, groups
//!                filter                  →  one page of matching icons
//! ```
//!
//! The query modules are plain synchronous functions over a root path. The
//! [`web`] module wraps them in axum handlers and runs them on the blocking
//! pool; the CLI calls them directly and prints through [`output`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the quest root into a sorted directory tree |
//! | [`render`] | Reads one quest file and converts markdown to HTML |
//! | [`search`] | Parallel substring search with filename-weighted scoring |
//! | [`icons`] | Merges `.png`/`.tga` variants into one record per stem; raw file access |
//! | [`manifest`] | Tolerant group-manifest parsing and the once-per-process cache |
//! | [`filter`] | Group membership, text and folder filters, pagination |
//! | [`config`] | `config.toml` loading, environment overrides, validation, theme CSS |
//! | [`types`] | Shared result types serialized by the JSON API |
//! | [`naming`] | Hidden-entry rule, extension checks, safe path resolution |
//! | [`web`] | Routes, HTML pages (Maud), error mapping |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Index, No Watcher
//!
//! The repositories are small enough to walk on every request. Skipping an
//! index means there is no staleness to reason about. The one exception is
//! the icon manifest, which is parsed once per process and never reloaded.
//!
//! ## Tolerant Manifest
//!
//! Icon manifests in the wild come in several shapes: a top-level array, an
//! object keyed by group id, or either of those wrapped in a `groups` key,
//! with assorted spellings for ids, titles and item lists. [`manifest`]
//! accepts all of them and degrades to "no groups" rather than failing.
//!
//! ## Confinement
//!
//! Every user-supplied path goes through [`naming::resolve_under`], which
//! reads it relative to the root (a leading `/` is dropped) and rejects `..`
//! and drive prefixes.
//! A rejected path is indistinguishable from a missing one.

pub mod config;
pub mod filter;
pub mod icons;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod search;
pub mod types;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
