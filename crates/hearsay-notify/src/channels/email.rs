//! Transactional email sender (Resend-style JSON API).

use hearsay_core::{AppConfig, Channel};
use hearsay_db::PendingMentionRow;

use crate::error::NotifyError;
use crate::render::render_email;

use super::ChannelSender;

pub struct EmailSender {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl EmailSender {
    /// # Errors
    ///
    /// Returns [`NotifyError::Config`] when no email API key is set.
    pub fn new(config: &AppConfig) -> Result<Self, NotifyError> {
        let api_key = config
            .email_api_key
            .clone()
            .ok_or_else(|| NotifyError::Config("HEARSAY_EMAIL_API_KEY is not set".to_owned()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.email_api_base_url.trim_end_matches('/').to_owned(),
            api_key,
            from: config.email_from.clone(),
        })
    }
}

impl ChannelSender for EmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, mention: &PendingMentionRow) -> Result<(), NotifyError> {
        let message = render_email(mention);
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [mention.destination],
                "subject": message.subject,
                "text": message.body,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider(format!(
                "email provider returned {status}: {detail}"
            )));
        }

        Ok(())
    }
}
