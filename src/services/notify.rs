//! Telegram notifier.
//!
//! Delivers one message per new listing via the Bot API, with link
//! previews suppressed so a batch of notifications stays compact.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Listing;

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Client for the Telegram `sendMessage` endpoint.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
    post_url_base: String,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(
        client: reqwest::Client,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        post_url_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            post_url_base: post_url_base.into(),
            api_base: TELEGRAM_API.to_string(),
        }
    }

    /// Override the API origin. Lets tests point at a local server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send a plain text message to the configured chat.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = SendMessageBody {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::notify(format!(
                "Telegram API returned {}: {}",
                status, detail
            )));
        }
        Ok(())
    }

    /// Send the notification for one new listing.
    pub async fn notify_listing(&self, listing: &Listing) -> Result<()> {
        let message = listing.format_message(&self.post_url_base);
        self.send_text(&message).await
    }

    /// Send the one-time startup announcement. Best-effort: a failure is
    /// logged by the caller and otherwise ignored.
    pub async fn send_startup(&self) -> Result<()> {
        let started_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let message = format!(
            "🤖 아르바이트 알림 봇이 시작되었습니다! ({})\n24시간 자동으로 새 공고를 확인합니다.",
            started_at
        );
        self.send_text(&message).await
    }
}
