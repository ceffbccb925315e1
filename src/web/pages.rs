//! HTML pages.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time templating; all
//! interpolation is escaped except rendered quest HTML, which is trusted
//! local content.

use crate::filter::IconQuery;
use crate::render::RenderedQuest;
use crate::types::{IconListing, IconRecord, QuestNode, QuestSearchResult};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use urlencoding::encode;

pub const STYLE_PATH: &str = "/static/style.css";

/// Top-level section, for highlighting the header nav.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Quests,
    Icons,
}

/// What the main pane of the quests page shows.
#[derive(Debug, Clone, Copy)]
pub enum QuestPane<'a> {
    Welcome,
    Document(&'a RenderedQuest),
    Search {
        query: &'a str,
        results: &'a [QuestSearchResult],
    },
}

// ============================================================================
// URLs
// ============================================================================

pub fn quest_url(path: &str) -> String {
    format!("/quests/view?path={}", encode(path))
}

pub fn quest_search_url(query: &str) -> String {
    format!("/quests/search?q={}", encode(query))
}

/// URL of a raw icon file; each path segment is encoded separately.
pub fn icon_raw_url(path: &str) -> String {
    let segments: Vec<String> = path.split('/').map(|s| encode(s).into_owned()).collect();
    format!("/icons/raw/{}", segments.join("/"))
}

/// Icon browser URL, keeping only the non-empty parameters.
pub fn icons_url(group: Option<&str>, q: Option<&str>, folder: Option<&str>, page: usize) -> String {
    let mut params = Vec::new();
    for (key, value) in [("group", group), ("q", q), ("folder", folder)] {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            params.push(format!("{key}={}", encode(v)));
        }
    }
    if page > 1 {
        params.push(format!("page={page}"));
    }
    if params.is_empty() {
        "/icons".to_string()
    } else {
        format!("/icons?{}", params.join("&"))
    }
}

// ============================================================================
// Components
// ============================================================================

fn base_document(title: &str, section: Section, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Metin2 Tools" }
                link rel="stylesheet" href=(STYLE_PATH);
            }
            body {
                (site_header(section))
                (content)
            }
        }
    }
}

fn site_header(section: Section) -> Markup {
    let link = |target: Section, href: &str, label: &str| {
        html! {
            a class=[(section == target).then_some("current")] href=(href) { (label) }
        }
    };
    html! {
        header.site-header {
            a.brand href="/" { "Metin2 Tools" }
            nav.site-nav {
                (link(Section::Quests, "/quests", "Quests"))
                (link(Section::Icons, "/icons", "Icons"))
            }
        }
    }
}

/// Renders the quest tree; directories on the path to `current` start open.
pub fn render_tree(nodes: &[QuestNode], current: Option<&str>) -> Markup {
    html! {
        ul {
            @for node in nodes {
                @if node.is_dir() {
                    @let open = current.is_some_and(|c| c.starts_with(&format!("{}/", node.path)));
                    li {
                        details open[open] {
                            summary { (node.name) }
                            (render_tree(&node.children, current))
                        }
                    }
                } @else {
                    @let is_current = current == Some(node.path.as_str());
                    li class=[is_current.then_some("current")] {
                        a href=(quest_url(&node.path)) { (node.name) }
                    }
                }
            }
        }
    }
}

fn quest_search_form(query: &str) -> Markup {
    html! {
        form.search-form action="/quests/search" method="get" {
            input type="search" name="q" value=(query) placeholder="Search quests";
            button type="submit" { "Search" }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

pub fn render_index() -> Markup {
    let content = html! {
        main.content {
            h1 { "Metin2 Tools" }
            ul {
                li { a href="/quests" { "Quest functions" } " " span.muted { "browse and search the quest documentation" } }
                li { a href="/icons" { "Icons" } " " span.muted { "browse the icon catalog by group" } }
            }
        }
    };
    base_document("Home", Section::Home, content)
}

pub fn render_quests_page(tree: &[QuestNode], pane: QuestPane<'_>) -> Markup {
    let (title, current, query) = match pane {
        QuestPane::Welcome => ("Quests".to_string(), None, ""),
        QuestPane::Document(doc) => (doc.title.clone(), Some(doc.path.as_str()), ""),
        QuestPane::Search { query, .. } => (format!("Search: {query}"), None, query),
    };

    let content = html! {
        div.layout {
            aside.sidebar {
                (quest_search_form(query))
                @if tree.is_empty() {
                    p.muted { "No quest files found." }
                } @else {
                    (render_tree(tree, current))
                }
            }
            main.content {
                @match pane {
                    QuestPane::Welcome => {
                        p.muted { "Select a file on the left." }
                    }
                    QuestPane::Document(doc) => {
                        p.muted { (doc.path) }
                        article { (PreEscaped(&doc.html)) }
                    }
                    QuestPane::Search { query, results } => {
                        (render_search_results(query, results))
                    }
                }
            }
        }
    };
    base_document(&title, Section::Quests, content)
}

fn render_search_results(query: &str, results: &[QuestSearchResult]) -> Markup {
    html! {
        h2 { "Results for “" (query) "”" }
        @if results.is_empty() {
            p.muted { "Nothing matched." }
        } @else {
            ol.results {
                @for r in results {
                    li {
                        a href=(quest_url(&r.path)) { (r.name) }
                        " " span.muted { (r.path) }
                        @if !r.snippet.is_empty() {
                            span.snippet { "…" (r.snippet) "…" }
                        }
                    }
                }
            }
        }
    }
}

fn icon_card(icon: &IconRecord) -> Markup {
    html! {
        div.icon-card title=(icon.folder) {
            @if let Some(png) = &icon.png {
                img src=(icon_raw_url(png)) alt=(icon.name) loading="lazy";
            } @else {
                span.no-preview {}
            }
            span { (icon.name) }
            @if let Some(tga) = &icon.tga {
                a href=(icon_raw_url(tga)) download { "tga" }
            }
        }
    }
}

pub fn render_icons_page(listing: &IconListing, query: &IconQuery) -> Markup {
    let page = &listing.page;
    let selected = listing.selected_group.as_ref().map(|g| g.id.as_str());
    let q = query.q.as_deref();
    let folder = query.folder.as_deref();

    let content = html! {
        div.layout {
            aside.sidebar {
                ul {
                    li class=[selected.is_none().then_some("current")] {
                        a href=(icons_url(None, q, folder, 1)) { "All icons" }
                    }
                    @for group in &listing.groups {
                        @let is_current = selected == Some(group.id.as_str());
                        li class=[is_current.then_some("current")] {
                            a href=(icons_url(Some(&group.id), q, folder, 1)) { (group.title) }
                        }
                    }
                }
            }
            main.content {
                form.search-form action="/icons" method="get" {
                    @if let Some(group) = selected {
                        input type="hidden" name="group" value=(group);
                    }
                    @if let Some(folder) = folder.filter(|f| !f.trim().is_empty()) {
                        input type="hidden" name="folder" value=(folder);
                    }
                    input type="search" name="q" value=(q.unwrap_or("")) placeholder="Filter by name";
                    button type="submit" { "Filter" }
                }
                p.muted {
                    @if let Some(group) = &listing.selected_group {
                        (group.title) " · "
                    }
                    (page.total) " icons · page " (page.page) " of " (page.pages)
                }
                div.icon-grid {
                    @for icon in &page.items {
                        (icon_card(icon))
                    }
                }
                nav.pager {
                    @if page.has_prev() {
                        a rel="prev" href=(icons_url(selected, q, folder, page.page.saturating_sub(1).min(page.pages))) { "← Previous" }
                    }
                    @if page.has_next() {
                        a rel="next" href=(icons_url(selected, q, folder, page.page + 1)) { "Next →" }
                    }
                }
            }
        }
    };
    base_document("Icons", Section::Icons, content)
}
