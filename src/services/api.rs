//! Structured API source adapter.
//!
//! Fetches listings from the board's JSON API. Field names have drifted
//! across API revisions, so both the entry container and each field are
//! resolved through an ordered list of alternates, first non-empty wins.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, Listing};
use crate::services::SourceAdapter;

/// Candidate keys holding the entry array in the API payload.
const ENTRY_KEYS: &[&str] = &["articles", "posts", "items", "data"];

/// Alternate field names, in preference order.
const ID_FIELDS: &[&str] = &["id", "article_id", "seq", "no"];
const TITLE_FIELDS: &[&str] = &["title", "subject"];
const AUTHOR_FIELDS: &[&str] = &["author", "nickname", "writer", "name"];
const DATE_FIELDS: &[&str] = &["created_at", "createdAt", "date", "reg_date"];
const CATEGORY_FIELDS: &[&str] = &["board_name", "category", "board", "tag"];
const LINK_FIELDS: &[&str] = &["url", "link", "permalink"];

/// Adapter for the structured board API.
pub struct ApiSource {
    config: Arc<Config>,
}

impl ApiSource {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Locate the entry array under the first candidate key that holds a
    /// non-empty array.
    fn entries(payload: &Value) -> &[Value] {
        for key in ENTRY_KEYS {
            if let Some(Value::Array(entries)) = payload.get(key) {
                if !entries.is_empty() {
                    return entries;
                }
            }
        }
        &[]
    }

    /// Resolve a field through its alternate names, first non-empty wins.
    /// Numeric values are stringified so ids survive either encoding.
    fn field(raw: &Value, names: &[&str]) -> String {
        for name in names {
            match raw.get(name) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Number(n)) => return n.to_string(),
                _ => {}
            }
        }
        String::new()
    }

    /// Parse one raw API entry into a listing.
    fn parse_entry(raw: &Value) -> Option<Listing> {
        if !raw.is_object() {
            return None;
        }

        let id = Self::field(raw, ID_FIELDS);
        let title = Self::field(raw, TITLE_FIELDS);

        // An entry with neither identifier nor title cannot be keyed.
        if id.is_empty() && title.is_empty() {
            return None;
        }

        Some(Listing {
            id,
            title,
            author: Self::field(raw, AUTHOR_FIELDS),
            date: Self::field(raw, DATE_FIELDS),
            category: Self::field(raw, CATEGORY_FIELDS),
            link: Self::field(raw, LINK_FIELDS),
        })
    }
}

#[async_trait]
impl SourceAdapter for ApiSource {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<Listing>> {
        let board = &self.config.board;
        let response = client
            .get(&board.api_url)
            .query(&[("board_id", board.board_id), ("limit", board.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(
                board.api_url.as_str(),
                format!("status {}", status),
            ));
        }

        let payload: Value = response.json().await?;
        let mut listings = Vec::new();
        for raw in Self::entries(&payload) {
            match Self::parse_entry(raw) {
                Some(listing) => listings.push(listing),
                None => log::warn!("Skipping unparseable API entry: {}", raw),
            }
        }
        Ok(listings)
    }
}
