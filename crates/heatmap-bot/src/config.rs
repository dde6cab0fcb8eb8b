use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct BotConfig {
    // External APIs
    pub finnhub_api_key: String,

    // Telegram delivery
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    // Scheduling
    pub refresh_interval_seconds: u64, // 600 (10 minutes)
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            finnhub_api_key: env::var("FINNHUB_API_KEY")
                .context("FINNHUB_API_KEY not set")?,
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .context("TELEGRAM_BOT_TOKEN not set")?,
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID")
                .context("TELEGRAM_CHAT_ID not set")?,
            refresh_interval_seconds: env::var("REFRESH_INTERVAL")
                .unwrap_or_else(|_| "600".to_string())
                .parse()?,
        };

        Ok(config)
    }
}
