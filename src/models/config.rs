//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Listing, MarkupSelectors};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Board endpoint settings
    #[serde(default)]
    pub board: BoardConfig,

    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Poll loop timing settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// Listing filter policy
    #[serde(default)]
    pub filter: FilterPolicy,

    /// Selector lists for the HTML fallback parser
    #[serde(default)]
    pub selectors: MarkupSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.board.api_url.trim().is_empty() {
            return Err(AppError::validation("board.api_url is empty"));
        }
        if self.board.page_url.trim().is_empty() {
            return Err(AppError::validation("board.page_url is empty"));
        }
        if self.board.limit == 0 {
            return Err(AppError::validation("board.limit must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.fetch_timeout_secs == 0 {
            return Err(AppError::validation("http.fetch_timeout_secs must be > 0"));
        }
        if self.http.notify_timeout_secs == 0 {
            return Err(AppError::validation("http.notify_timeout_secs must be > 0"));
        }
        if self.poller.check_interval_secs == 0 {
            return Err(AppError::validation("poller.check_interval_secs must be > 0"));
        }
        if self.selectors.row_selectors.is_empty() {
            return Err(AppError::validation("selectors.row_selectors is empty"));
        }
        match &self.filter {
            FilterPolicy::TitleKeywords { keywords } if keywords.is_empty() => {
                Err(AppError::validation("filter keywords list is empty"))
            }
            FilterPolicy::CategoryContains { category } if category.trim().is_empty() => {
                Err(AppError::validation("filter category is empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Board endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Structured API endpoint for listing articles
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Rendered board page, used when the API is unavailable
    #[serde(default = "defaults::page_url")]
    pub page_url: String,

    /// Origin used to resolve relative links found in markup
    #[serde(default = "defaults::base_origin")]
    pub base_origin: String,

    /// Base URL for constructing post permalinks from ids
    #[serde(default = "defaults::post_url_base")]
    pub post_url_base: String,

    /// Board id passed to the API
    #[serde(default = "defaults::board_id")]
    pub board_id: u32,

    /// Page size passed to the API
    #[serde(default = "defaults::limit")]
    pub limit: u32,

    /// Path to the persisted seen-set file
    #[serde(default = "defaults::state_file")]
    pub state_file: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            page_url: defaults::page_url(),
            base_origin: defaults::base_origin(),
            post_url_base: defaults::post_url_base(),
            board_id: defaults::board_id(),
            limit: defaults::limit(),
            state_file: defaults::state_file(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for board requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Board request timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Telegram request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub notify_timeout_secs: u64,

    /// Pacing delay between consecutive notifications in seconds
    #[serde(default = "defaults::notify_delay")]
    pub notify_delay_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            fetch_timeout_secs: defaults::fetch_timeout(),
            notify_timeout_secs: defaults::notify_timeout(),
            notify_delay_secs: defaults::notify_delay(),
        }
    }
}

/// Poll loop timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between board checks
    #[serde(default = "defaults::check_interval")]
    pub check_interval_secs: u64,

    /// Recovery delay after an unclassified tick error, in seconds
    #[serde(default = "defaults::error_backoff")]
    pub error_backoff_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: defaults::check_interval(),
            error_backoff_secs: defaults::error_backoff(),
        }
    }
}

/// Predicate selecting which listings are worth notifying about.
///
/// The two policies correspond to the two board variants the notifier has
/// targeted: a keyword scan over titles, and a category-label match for
/// boards that tag posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Retain listings whose title contains any of the keywords
    TitleKeywords {
        #[serde(default = "defaults::keywords")]
        keywords: Vec<String>,
    },

    /// Retain listings whose category contains the substring
    CategoryContains { category: String },
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::TitleKeywords {
            keywords: defaults::keywords(),
        }
    }
}

impl FilterPolicy {
    /// Pure predicate: does this listing pass the configured filter?
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Self::TitleKeywords { keywords } => {
                let title = listing.title.to_lowercase();
                keywords.iter().any(|k| title.contains(&k.to_lowercase()))
            }
            Self::CategoryContains { category } => listing.category.contains(category.as_str()),
        }
    }
}

mod defaults {
    // Board defaults
    pub fn api_url() -> String {
        "https://api.koreatech.in/articles".into()
    }
    pub fn page_url() -> String {
        "https://koreatech.in/board/job".into()
    }
    pub fn base_origin() -> String {
        "https://koreatech.in".into()
    }
    pub fn post_url_base() -> String {
        "https://koreatech.in/board".into()
    }
    pub fn board_id() -> u32 {
        3
    }
    pub fn limit() -> u32 {
        20
    }
    pub fn state_file() -> String {
        "seen_posts.json".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn fetch_timeout() -> u64 {
        15
    }
    pub fn notify_timeout() -> u64 {
        10
    }
    pub fn notify_delay() -> u64 {
        2
    }

    // Poller defaults
    pub fn check_interval() -> u64 {
        300
    }
    pub fn error_backoff() -> u64 {
        60
    }

    // Filter defaults
    pub fn keywords() -> Vec<String> {
        vec![
            "아르바이트".into(),
            "알바".into(),
            "구인".into(),
            "구함".into(),
            "모집".into(),
        ]
    }
}
