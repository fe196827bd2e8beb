//! Delivery boundary used by the executor's callers and the reminder engine.

use async_trait::async_trait;
use teloxide::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram delivery failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[cfg(test)]
    #[error("delivery rejected")]
    Rejected,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), NotifyError>;
}

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), NotifyError> {
        self.bot.send_message(ChatId(user_id), text).await?;
        Ok(())
    }
}
