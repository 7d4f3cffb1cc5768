// src/services/mod.rs

//! Board source adapters and the Telegram notifier.

mod api;
mod markup;
mod notify;

pub use api::ApiSource;
pub use markup::MarkupSource;
pub use notify::TelegramNotifier;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, Listing};
use crate::utils::http;

/// A source of candidate listings.
///
/// Implemented by the structured API adapter and the HTML fallback
/// adapter; the poll loop selects between them through [`Fetcher`].
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Fetch the current batch of listings from the board.
    async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<Listing>>;
}

/// Fetches listings from the board, preferring the API and falling back
/// to parsing the rendered page.
pub struct Fetcher {
    client: reqwest::Client,
    primary: ApiSource,
    fallback: MarkupSource,
}

impl Fetcher {
    /// Create a fetcher with both adapters wired from configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_board_client(&config.http)?;
        Ok(Self {
            client,
            primary: ApiSource::new(Arc::clone(&config)),
            fallback: MarkupSource::new(config),
        })
    }

    /// Fetch candidate listings for one tick.
    ///
    /// Any primary-path failure degrades to the HTML page; when that also
    /// fails the tick proceeds with an empty batch rather than aborting.
    pub async fn fetch(&self) -> Vec<Listing> {
        match self.primary.fetch(&self.client).await {
            Ok(listings) => listings,
            Err(primary_err) => {
                log::warn!(
                    "{} fetch failed ({}), falling back to {}",
                    self.primary.name(),
                    primary_err,
                    self.fallback.name()
                );
                match self.fallback.fetch(&self.client).await {
                    Ok(listings) => listings,
                    Err(fallback_err) => {
                        log::warn!(
                            "{} fetch failed ({}), skipping this tick",
                            self.fallback.name(),
                            fallback_err
                        );
                        Vec::new()
                    }
                }
            }
        }
    }
}
