// src/models/mod.rs

//! Domain models for the notifier application.

mod config;
mod listing;
mod selectors;

// Re-export all public types
pub use config::{BoardConfig, Config, FilterPolicy, HttpConfig, PollerConfig};
pub use listing::{ANONYMOUS, Listing, NO_TITLE};
pub use selectors::MarkupSelectors;
