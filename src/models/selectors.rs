//! Markup selector configuration.
//!
//! Ordered CSS selector lists for the HTML fallback parser. Each list is
//! tried in order and the first selector that yields any match wins; the
//! lists are never unioned. This mirrors the live board markup, which has
//! shipped under several themes over time.

use serde::{Deserialize, Serialize};

/// Selector lists for locating listing rows and their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupSelectors {
    /// Candidate selectors for a listing row, first match wins
    #[serde(default = "defaults::row_selectors")]
    pub row_selectors: Vec<String>,

    /// Candidate selectors for the category cell within a row
    #[serde(default = "defaults::category_selectors")]
    pub category_selectors: Vec<String>,

    /// Candidate selectors for the title element within a row
    #[serde(default = "defaults::title_selectors")]
    pub title_selectors: Vec<String>,

    /// Candidate selectors for the link anchor within a row
    #[serde(default = "defaults::link_selectors")]
    pub link_selectors: Vec<String>,

    /// Candidate selectors for the author cell within a row
    #[serde(default = "defaults::author_selectors")]
    pub author_selectors: Vec<String>,

    /// Candidate selectors for the date cell within a row
    #[serde(default = "defaults::date_selectors")]
    pub date_selectors: Vec<String>,

    /// HTML attribute holding the link target
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for MarkupSelectors {
    fn default() -> Self {
        Self {
            row_selectors: defaults::row_selectors(),
            category_selectors: defaults::category_selectors(),
            title_selectors: defaults::title_selectors(),
            link_selectors: defaults::link_selectors(),
            author_selectors: defaults::author_selectors(),
            date_selectors: defaults::date_selectors(),
            link_attr: defaults::link_attr(),
        }
    }
}

mod defaults {
    pub fn row_selectors() -> Vec<String> {
        vec![
            "table.board-list tbody tr".into(),
            "table tbody tr:has(a)".into(),
            "ul.board-list li:has(a)".into(),
            "div.board-list .board-item".into(),
        ]
    }

    pub fn category_selectors() -> Vec<String> {
        vec![
            "td.board-category".into(),
            "td:nth-child(2)".into(),
            ".category".into(),
        ]
    }

    pub fn title_selectors() -> Vec<String> {
        vec![
            "td.board-title a".into(),
            "a.title".into(),
            "td a".into(),
            "a".into(),
        ]
    }

    pub fn link_selectors() -> Vec<String> {
        vec!["td.board-title a".into(), "td a".into(), "a".into()]
    }

    pub fn author_selectors() -> Vec<String> {
        vec![
            "td.board-author".into(),
            "td.writer".into(),
            ".author".into(),
        ]
    }

    pub fn date_selectors() -> Vec<String> {
        vec![
            "td.board-date".into(),
            "td:nth-last-child(2)".into(),
            ".date".into(),
        ]
    }

    pub fn link_attr() -> String {
        "href".into()
    }
}
