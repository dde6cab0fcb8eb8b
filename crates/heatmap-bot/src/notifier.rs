use anyhow::Result;
use heatmap_core::HeatmapError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Telegram Bot API delivery to one fixed chat. No retry on failure;
/// callers decide whether a failed send matters.
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            chat_id,
        }
    }

    /// Send the heatmap image with the summary as its caption.
    pub async fn send_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("image/svg+xml")?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .client
            .post(format!(
                "{}/bot{}/sendDocument",
                TELEGRAM_API, self.bot_token
            ))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HeatmapError::DeliveryError(format!(
                "sendDocument HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ))
            .into());
        }

        tracing::debug!("Heatmap document delivered");
        Ok(())
    }

    /// Plain-text message, used as the error-path fallback.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", TELEGRAM_API, self.bot_token))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HeatmapError::DeliveryError(format!(
                "sendMessage HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ))
            .into());
        }

        tracing::debug!("Telegram notification sent");
        Ok(())
    }
}
