// src/config.rs

//! Environment-backed configuration.
//!
//! The Telegram credential and destination chat are secrets and only ever
//! come from the environment; the poll interval may be overridden there
//! as well. Everything else lives in the TOML config file.

use std::env;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable holding the bot credential.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the destination chat id.
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Optional environment override for the poll interval, in seconds.
pub const ENV_CHECK_INTERVAL: &str = "CHECK_INTERVAL";

/// Telegram credentials read from the environment.
pub struct TelegramEnv {
    pub bot_token: String,
    pub chat_id: String,
}

/// Read the required Telegram credentials.
///
/// A missing or empty variable is a configuration error; the process must
/// not start without a deliverable destination.
pub fn telegram_from_env() -> Result<TelegramEnv> {
    let bot_token = require_env(ENV_BOT_TOKEN)?;
    let chat_id = require_env(ENV_CHAT_ID)?;
    Ok(TelegramEnv { bot_token, chat_id })
}

/// Apply optional environment overrides to the loaded configuration.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = env::var(ENV_CHECK_INTERVAL) {
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => {
                log::info!("{} override: {}s", ENV_CHECK_INTERVAL, secs);
                config.poller.check_interval_secs = secs;
            }
            _ => log::warn!(
                "Ignoring invalid {} value '{}', keeping {}s",
                ENV_CHECK_INTERVAL,
                value,
                config.poller.check_interval_secs
            ),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "{} is not set. Set it in the environment before starting.",
            name
        ))),
    }
}
