//! Application configuration.
//!
//! Configuration is layered, later layers overriding earlier ones:
//!
//! 1. Stock defaults ([`AppConfig::default`])
//! 2. An optional `config.toml` (explicit `--config` path, or `<data_dir>/config.toml`)
//! 3. Environment variables (see [`ENV_VARS`])
//! 4. CLI flags, applied by the binary
//!
//! ## Content Locations
//!
//! Both content repositories live under a single data directory by default:
//!
//! ```text
//! data/                          # DATA_DIR
//! ├── config.toml                # Optional
//! ├── metin2-quest-functions/    # Quest root (.md / .txt tree)
//! └── metin2-icons/              # Icon root (.png / .tga tree)
//!     └── manifest.json          # Icon groups
//! ```
//!
//! Either root can be pointed elsewhere with `quest_root` / `icon_root`.
//!
//! ## Configuration Options
//!
//! ```toml
//! data_dir = "data"
//! # quest_root = "/srv/quests"
//! # icon_root = "/srv/icons"
//! bind_addr = "127.0.0.1:8000"
//!
//! [icons]
//! page_size = 60
//! manifest_file = "manifest.json"
//! locale = "en"
//!
//! [search]
//! limit = 50
//!
//! [theme]
//! accent = "#c8a15a"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Environment variables read by [`apply_env`], in the order they are applied.
pub const ENV_VARS: &[&str] = &[
    "DATA_DIR",
    "QUEST_REPO_PATH",
    "ICONS_REPO_PATH",
    "BIND_ADDR",
    "ICONS_PAGE_SIZE",
    "MANIFEST_LOCALE",
    "QUEST_SEARCH_LIMIT",
];

const QUEST_DIR_NAME: &str = "metin2-quest-functions";
const ICON_DIR_NAME: &str = "metin2-icons";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Base directory holding both content repositories.
    pub data_dir: PathBuf,
    /// Quest root override. Defaults to `<data_dir>/metin2-quest-functions`.
    pub quest_root: Option<PathBuf>,
    /// Icon root override. Defaults to `<data_dir>/metin2-icons`.
    pub icon_root: Option<PathBuf>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    pub icons: IconsConfig,
    pub search: SearchConfig,
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            quest_root: None,
            icon_root: None,
            bind_addr: "127.0.0.1:8000".to_string(),
            icons: IconsConfig::default(),
            search: SearchConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn quest_root(&self) -> PathBuf {
        self.quest_root
            .clone()
            .unwrap_or_else(|| self.data_dir.join(QUEST_DIR_NAME))
    }

    pub fn icon_root(&self) -> PathBuf {
        self.icon_root
            .clone()
            .unwrap_or_else(|| self.data_dir.join(ICON_DIR_NAME))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.icon_root().join(&self.icons.manifest_file)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "bind_addr must be a socket address, got {:?}",
                self.bind_addr
            ))
        })
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.icons.page_size == 0 {
            return Err(ConfigError::Validation(
                "icons.page_size must be at least 1".into(),
            ));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Validation(
                "search.limit must be at least 1".into(),
            ));
        }
        if self.icons.manifest_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "icons.manifest_file must not be empty".into(),
            ));
        }
        self.socket_addr()?;
        Ok(())
    }
}

/// Icon browser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Icons per page in the browser grid.
    pub page_size: usize,
    /// Manifest file name, relative to the icon root.
    pub manifest_file: String,
    /// Preferred locale key when a manifest group title is localized.
    pub locale: String,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            page_size: 60,
            manifest_file: "manifest.json".to_string(),
            locale: "en".to_string(),
        }
    }
}

/// Quest search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum number of results returned.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

/// UI colors, emitted as CSS custom properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub background: String,
    pub panel: String,
    pub text: String,
    pub muted: String,
    pub accent: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#16130f".to_string(),
            panel: "#221d17".to_string(),
            text: "#e8dfcf".to_string(),
            muted: "#9a8f7c".to_string(),
            accent: "#c8a15a".to_string(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Read and parse a config file. Missing files are not an error.
pub fn load_file(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(Some(config))
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Taking a lookup function keeps this testable without mutating the
/// process environment.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("DATA_DIR") {
        config.data_dir = PathBuf::from(v);
    }
    if let Some(v) = get("QUEST_REPO_PATH") {
        config.quest_root = Some(PathBuf::from(v));
    }
    if let Some(v) = get("ICONS_REPO_PATH") {
        config.icon_root = Some(PathBuf::from(v));
    }
    if let Some(v) = get("BIND_ADDR") {
        config.bind_addr = v;
    }
    if let Some(v) = get("ICONS_PAGE_SIZE") {
        config.icons.page_size = parse_env_number("ICONS_PAGE_SIZE", &v)?;
    }
    if let Some(v) = get("MANIFEST_LOCALE") {
        config.icons.locale = v;
    }
    if let Some(v) = get("QUEST_SEARCH_LIMIT") {
        config.search.limit = parse_env_number("QUEST_SEARCH_LIMIT", &v)?;
    }
    Ok(())
}

fn parse_env_number(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{key} must be a non-negative integer, got {value:?}"))
    })
}

/// Load config from defaults, an optional file, and the process environment.
///
/// With no explicit path, `<data_dir>/config.toml` is tried, where `data_dir`
/// is `data_dir_flag` if given, else `DATA_DIR`, else the stock default.
pub fn load_config(
    explicit: Option<&Path>,
    data_dir_flag: Option<&Path>,
) -> Result<AppConfig, ConfigError> {
    load_config_with(explicit, data_dir_flag, |key| std::env::var(key).ok())
}

pub fn load_config_with<F>(
    explicit: Option<&Path>,
    data_dir_flag: Option<&Path>,
    lookup: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match explicit {
        Some(path) => path.to_path_buf(),
        None => data_dir_flag
            .map(Path::to_path_buf)
            .or_else(|| {
                lookup("DATA_DIR")
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| AppConfig::default().data_dir)
            .join("config.toml"),
    };
    let mut config = match load_file(&file)? {
        Some(config) => config,
        None if explicit.is_some() => {
            return Err(ConfigError::Validation(format!(
                "config file not found: {}",
                file.display()
            )));
        }
        None => AppConfig::default(),
    };
    apply_env(&mut config, lookup)?;
    if let Some(dir) = data_dir_flag {
        config.data_dir = dir.to_path_buf();
    }
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# m2-tools-ui configuration
# ==========================
# All keys are optional; the values below are the defaults.
# Environment variables (DATA_DIR, QUEST_REPO_PATH, ICONS_REPO_PATH, BIND_ADDR,
# ICONS_PAGE_SIZE, MANIFEST_LOCALE, QUEST_SEARCH_LIMIT) override this file.

# Base directory holding both content repositories.
data_dir = "data"

# Override the quest root (default: <data_dir>/metin2-quest-functions).
# quest_root = "/srv/metin2-quest-functions"

# Override the icon root (default: <data_dir>/metin2-icons).
# icon_root = "/srv/metin2-icons"

# Address the HTTP server listens on.
bind_addr = "127.0.0.1:8000"

# ---------------------------------------------------------------------------
# Icon browser
# ---------------------------------------------------------------------------
[icons]
# Icons per page.
page_size = 60

# Group manifest, relative to the icon root. Read once per process.
manifest_file = "manifest.json"

# Preferred locale key for localized group titles.
locale = "en"

# ---------------------------------------------------------------------------
# Quest search
# ---------------------------------------------------------------------------
[search]
# Maximum number of results.
limit = 50

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[theme]
background = "#16130f"
panel = "#221d17"
text = "#e8dfcf"
muted = "#9a8f7c"
accent = "#c8a15a"
"##
}

/// Generate CSS custom properties from the theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-panel: {panel};
    --color-text: {text};
    --color-muted: {muted};
    --color-accent: {accent};
}}"#,
        background = theme.background,
        panel = theme.panel,
        text = theme.text,
        muted = theme.muted,
        accent = theme.accent,
    )
}
