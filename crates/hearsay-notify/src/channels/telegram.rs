//! Telegram bot sender (`sendMessage`, HTML parse mode).

use hearsay_core::{AppConfig, Channel};
use hearsay_db::PendingMentionRow;

use crate::error::NotifyError;
use crate::render::render_telegram;

use super::ChannelSender;

pub struct TelegramSender {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl TelegramSender {
    /// # Errors
    ///
    /// Returns [`NotifyError::Config`] when no bot token is set.
    pub fn new(config: &AppConfig) -> Result<Self, NotifyError> {
        let bot_token = config
            .telegram_bot_token
            .clone()
            .ok_or_else(|| NotifyError::Config("TELEGRAM_BOT_TOKEN is not set".to_owned()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.telegram_api_base_url.trim_end_matches('/').to_owned(),
            bot_token,
        })
    }
}

impl ChannelSender for TelegramSender {
    fn channel(&self) -> Channel {
        Channel::Telegram
    }

    async fn send(&self, mention: &PendingMentionRow) -> Result<(), NotifyError> {
        let chat_id = mention.destination.trim();
        // Bot tokens look like "123456:ABC-DEF..."; a colon in the chat id
        // means the token was pasted into the wrong field.
        if chat_id.contains(':') {
            return Err(NotifyError::InvalidDestination(format!(
                "Telegram chat id for brand {} contains ':' — it looks like a bot token; \
                 configure the numeric chat id instead",
                mention.brand_name
            )));
        }

        let response = self
            .client
            .post(format!(
                "{}/bot{}/sendMessage",
                self.base_url, self.bot_token
            ))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": render_telegram(mention),
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider(format!(
                "Telegram API returned {status}: {detail}"
            )));
        }

        Ok(())
    }
}
