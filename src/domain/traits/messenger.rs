use async_trait::async_trait;
use crate::application::errors::BotError;

/// Messenger trait - outbound messages to chat users
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Answer an inbound event
    async fn reply_text(&self, reply_token: &str, to: &str, text: &str) -> Result<(), BotError>;

    /// Push a message to a user outside of any conversation
    async fn push_text(&self, to: &str, text: &str) -> Result<(), BotError>;
}
