//! Local HTTP server.
//!
//! | Route | Response |
//! |-------|----------|
//! | `/` | landing page |
//! | `/quests`, `/quests/view?path=`, `/quests/search?q=` | quest browser pages |
//! | `/icons?group=&q=&folder=&page=` | icon browser page |
//! | `/icons/raw/{path}` | icon bytes |
//! | `/static/style.css` | theme variables plus the stylesheet |
//! | `/api/quests/tree`, `/api/quests/view`, `/api/quests/search` | quest JSON |
//! | `/api/icons`, `/api/icons/groups` | icon JSON |
//!
//! Anything else is a 404.

pub mod error;
pub mod handlers;
pub mod pages;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{self, AppConfig, ConfigError};
use crate::manifest::ManifestCache;

const STYLESHEET: &str = include_str!("../../static/style.css");

/// Shared, read-only server state.
#[derive(Debug)]
pub struct AppState {
    pub quest_root: PathBuf,
    pub icon_root: PathBuf,
    pub page_size: usize,
    pub search_limit: usize,
    pub manifest: ManifestCache,
    /// Theme variables followed by the stylesheet
    pub css: String,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let css = format!(
            "{}\n{}",
            config::generate_theme_css(&config.theme),
            STYLESHEET
        );
        Self {
            quest_root: config.quest_root(),
            icon_root: config.icon_root(),
            page_size: config.icons.page_size,
            search_limit: config.search.limit,
            manifest: ManifestCache::new(config.manifest_path(), config.icons.locale.clone()),
            css,
        }
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/quests", get(handlers::quests_page))
        .route("/quests/view", get(handlers::quest_view))
        .route("/quests/search", get(handlers::quest_search_page))
        .route("/icons", get(handlers::icons_page))
        .route("/icons/raw/{*path}", get(handlers::icon_raw))
        .route(pages::STYLE_PATH, get(handlers::style_css))
        .route("/api/quests/tree", get(handlers::api_tree))
        .route("/api/quests/view", get(handlers::api_quest_view))
        .route("/api/quests/search", get(handlers::api_search))
        .route("/api/icons", get(handlers::api_icons))
        .route("/api/icons/groups", get(handlers::api_groups))
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::from_config(config));
    info!(
        quests = %state.quest_root.display(),
        icons = %state.icon_root.display(),
        "serving repositories"
    );

    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
