//! Slack incoming-webhook sender.

use hearsay_core::Channel;
use hearsay_db::PendingMentionRow;

use crate::error::NotifyError;
use crate::render::render_slack;

use super::ChannelSender;

pub struct SlackSender {
    client: reqwest::Client,
}

impl SlackSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for SlackSender {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSender for SlackSender {
    fn channel(&self) -> Channel {
        Channel::Slack
    }

    async fn send(&self, mention: &PendingMentionRow) -> Result<(), NotifyError> {
        let webhook_url = mention.destination.trim();
        if !webhook_url.starts_with("https://") && !webhook_url.starts_with("http://") {
            return Err(NotifyError::InvalidDestination(format!(
                "Slack webhook for brand {} is not a URL",
                mention.brand_name
            )));
        }

        let response = self
            .client
            .post(webhook_url)
            .json(&serde_json::json!({ "text": render_slack(mention) }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider(format!(
                "Slack webhook returned {status}: {detail}"
            )));
        }

        Ok(())
    }
}
