// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create the client used for board requests.
pub fn create_board_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()?;
    Ok(client)
}

/// Create the client used for Telegram requests.
pub fn create_notify_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.notify_timeout_secs))
        .build()?;
    Ok(client)
}
