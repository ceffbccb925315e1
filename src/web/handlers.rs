//! Route handlers.
//!
//! Every handler re-reads the repositories it needs; filesystem work runs on
//! the blocking pool so slow disks never stall the async workers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use super::SharedState;
use super::error::WebError;
use super::pages::{self, QuestPane};
use crate::filter::{self, IconQuery};
use crate::render::{self, RenderedQuest};
use crate::types::{IconListing, ManifestGroup, QuestNode, QuestSearchResult};
use crate::{icons, scan, search};

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}

async fn blocking<T, F>(f: F) -> Result<T, WebError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

async fn quest_tree(state: &SharedState) -> Result<Vec<QuestNode>, WebError> {
    let state = Arc::clone(state);
    blocking(move || scan::scan_tree(&state.quest_root)).await
}

async fn quest_document(state: &SharedState, path: String) -> Result<RenderedQuest, WebError> {
    let state = Arc::clone(state);
    Ok(blocking(move || render::render_quest(&state.quest_root, &path)).await??)
}

async fn quest_search(state: &SharedState, query: String) -> Result<Vec<QuestSearchResult>, WebError> {
    let state = Arc::clone(state);
    blocking(move || search::search(&state.quest_root, &query, state.search_limit)).await
}

async fn icon_listing(state: &SharedState, query: IconQuery) -> Result<IconListing, WebError> {
    let state = Arc::clone(state);
    blocking(move || {
        let catalog = icons::build_catalog(&state.icon_root);
        let groups = state.manifest.groups();
        filter::list_icons(catalog, &groups, &query, state.page_size)
    })
    .await
}

// ============================================================================
// HTML
// ============================================================================

pub async fn index() -> Html<String> {
    Html(pages::render_index().into_string())
}

pub async fn quests_page(State(state): State<SharedState>) -> Result<Html<String>, WebError> {
    let tree = quest_tree(&state).await?;
    Ok(Html(pages::render_quests_page(&tree, QuestPane::Welcome).into_string()))
}

pub async fn quest_view(
    State(state): State<SharedState>,
    Query(query): Query<PathQuery>,
) -> Result<Html<String>, WebError> {
    let doc = quest_document(&state, query.path).await?;
    let tree = quest_tree(&state).await?;
    Ok(Html(
        pages::render_quests_page(&tree, QuestPane::Document(&doc)).into_string(),
    ))
}

pub async fn quest_search_page(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, WebError> {
    let results = quest_search(&state, query.q.clone()).await?;
    let tree = quest_tree(&state).await?;
    let pane = QuestPane::Search {
        query: query.q.trim(),
        results: &results,
    };
    Ok(Html(pages::render_quests_page(&tree, pane).into_string()))
}

pub async fn icons_page(
    State(state): State<SharedState>,
    Query(query): Query<IconQuery>,
) -> Result<Html<String>, WebError> {
    let listing = icon_listing(&state, query.clone()).await?;
    Ok(Html(pages::render_icons_page(&listing, &query).into_string()))
}

pub async fn icon_raw(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Response, WebError> {
    let root = state.icon_root.clone();
    let file = blocking(move || icons::read_icon(&root, &path)).await??;
    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes).into_response())
}

pub async fn style_css(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.css.clone(),
    )
}

pub async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

// ============================================================================
// JSON
// ============================================================================

pub async fn api_tree(State(state): State<SharedState>) -> Result<Json<Vec<QuestNode>>, WebError> {
    Ok(Json(quest_tree(&state).await?))
}

pub async fn api_quest_view(
    State(state): State<SharedState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<RenderedQuest>, WebError> {
    Ok(Json(quest_document(&state, query.path).await?))
}

pub async fn api_search(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QuestSearchResult>>, WebError> {
    Ok(Json(quest_search(&state, query.q).await?))
}

pub async fn api_icons(
    State(state): State<SharedState>,
    Query(query): Query<IconQuery>,
) -> Result<Json<IconListing>, WebError> {
    Ok(Json(icon_listing(&state, query).await?))
}

pub async fn api_groups(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ManifestGroup>>, WebError> {
    let state = Arc::clone(&state);
    let groups = blocking(move || state.manifest.groups()).await?;
    Ok(Json(groups.as_ref().clone()))
}
