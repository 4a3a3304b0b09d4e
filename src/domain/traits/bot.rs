use async_trait::async_trait;
use crate::domain::entities::{CheckInResult, GroundStatus};
use crate::application::errors::BotError;

/// CoscupBot trait - the bot logic façade the HTTP layer drives
///
/// The server never looks behind this trait: every route extracts its
/// parameters, calls exactly one method and formats the result.
#[async_trait]
pub trait CoscupBot: Send + Sync {
    /// Check a webhook signature header against the raw request body
    /// using the channel client's validator
    fn validate_signature(&self, body: &[u8], signature: &str) -> bool;

    /// Handle one webhook delivery (raw JSON body)
    async fn process_new_event(&self, body: &str) -> Result<(), BotError>;

    /// Next pending Edison photo request as a JSON document
    async fn get_edison_request(&self) -> Result<Option<String>, BotError>;

    /// Edison finished a photo (raw JSON body)
    async fn take_photo_done(&self, body: &str) -> Result<(), BotError>;

    /// Push the next realtime message to every friend, returns the recipient count
    async fn broadcast_realtime_message(&self) -> Result<usize, BotError>;

    /// Reload spreadsheet-backed data
    async fn sync_backend_data(&self) -> Result<bool, BotError>;

    async fn clear_take_photo_count(&self, mid: &str) -> Result<(), BotError>;

    async fn clear_ground_data(&self, mid: &str) -> Result<(), BotError>;

    async fn get_ground_game_status(&self, mid: &str) -> Result<GroundStatus, BotError>;

    /// Check `mid` in at sponsor `sp_id`
    async fn ground_game_check_in(&self, sp_id: &str, mid: &str) -> Result<CheckInResult, BotError>;

    /// Runtime summary for operators
    async fn get_status(&self) -> Result<serde_json::Value, BotError>;

    async fn is_bot_friend(&self, mid: &str) -> Result<bool, BotError>;

    async fn disable_take_photo(&self) -> Result<(), BotError>;

    async fn enable_take_photo(&self) -> Result<(), BotError>;
}
