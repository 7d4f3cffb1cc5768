//! HTML fallback source adapter.
//!
//! Parses the rendered board page with configured CSS selector lists.
//! Every list is tried in order and the first selector that yields a match
//! wins. The lists track the handful of markup themes the board has
//! shipped; keeping the literal first-match-wins order is what keeps this
//! adapter compatible with the live page.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ANONYMOUS, Config, Listing, MarkupSelectors, NO_TITLE};
use crate::services::SourceAdapter;
use crate::utils::{extract_post_id, resolve_url};

/// Adapter for the rendered board page.
pub struct MarkupSource {
    config: Arc<Config>,
}

impl MarkupSource {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Parse a fetched page into listings.
    pub fn parse_document(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);
        let selectors = &self.config.selectors;
        let base = Url::parse(&self.config.board.base_origin)?;

        let rows = Self::select_rows(&document, &selectors.row_selectors);
        let listings = rows
            .iter()
            .map(|row| self.parse_row(row, selectors, &base))
            .collect();
        Ok(listings)
    }

    /// Collect the row set from the first row selector that matches.
    fn select_rows<'a>(document: &'a Html, row_selectors: &[String]) -> Vec<ElementRef<'a>> {
        for selector_str in row_selectors {
            let Ok(selector) = Self::parse_selector(selector_str) else {
                log::warn!("Ignoring invalid row selector '{}'", selector_str);
                continue;
            };
            let rows: Vec<_> = document.select(&selector).collect();
            if !rows.is_empty() {
                return rows;
            }
        }
        Vec::new()
    }

    /// Extract one listing from a row element. Missing fields fall back
    /// to placeholders, so every selected row yields a listing.
    fn parse_row(&self, row: &ElementRef, selectors: &MarkupSelectors, base: &Url) -> Listing {
        let title = Self::first_text(row, &selectors.title_selectors)
            .unwrap_or_else(|| NO_TITLE.to_string());
        let author = Self::first_text(row, &selectors.author_selectors)
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let date = Self::first_text(row, &selectors.date_selectors).unwrap_or_default();
        let category = Self::first_text(row, &selectors.category_selectors).unwrap_or_default();

        let href = Self::first_element(row, &selectors.link_selectors)
            .and_then(|el| el.value().attr(&selectors.link_attr))
            .unwrap_or("");
        let id = extract_post_id(href);
        let link = if href.is_empty() {
            String::new()
        } else {
            resolve_url(base, href)
        };

        Listing {
            id,
            title,
            author,
            date,
            category,
            link,
        }
    }

    /// First matching element across an ordered selector list.
    fn first_element<'a>(row: &ElementRef<'a>, selectors: &[String]) -> Option<ElementRef<'a>> {
        for selector_str in selectors {
            let Ok(selector) = Self::parse_selector(selector_str) else {
                log::warn!("Ignoring invalid selector '{}'", selector_str);
                continue;
            };
            if let Some(element) = row.select(&selector).next() {
                return Some(element);
            }
        }
        None
    }

    /// Normalized text of the first matching element, if any.
    fn first_text(row: &ElementRef, selectors: &[String]) -> Option<String> {
        Self::first_element(row, selectors).and_then(|el| {
            let text = el
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() { None } else { Some(text) }
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl SourceAdapter for MarkupSource {
    fn name(&self) -> &'static str {
        "markup"
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<Listing>> {
        let board = &self.config.board;
        let response = client.get(&board.page_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(
                board.page_url.as_str(),
                format!("status {}", status),
            ));
        }

        let html = response.text().await?;
        self.parse_document(&html)
    }
}
