//! Local bot logic
//!
//! `LocalCoscupBot` keeps its state in a key-value `Store` and talks to
//! users through a `Messenger`. It implements the façade surface the
//! HTTP layer needs and nothing more.

pub mod sheet;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::application::errors::BotError;
use crate::domain::entities::{CheckInResult, GroundStatus, PhotoDone, PhotoRequest, SponsorRoster};
use crate::domain::traits::{CoscupBot, Messenger, Store};
use crate::infrastructure::adapters::line::{Event, SignatureValidator, WebhookBody};
use crate::infrastructure::config::{BotType, Config, SheetCredentials, WitTokens};

pub use sheet::{load_sheet, SheetData};

/// Photos one user may request before an admin clears the count
pub const MAX_TAKE_PHOTO: u32 = 3;

const PHOTO_KEYWORDS: [&str; 2] = ["photo", "拍照"];

const FRIEND_PREFIX: &str = "friend:";
const GROUND_PREFIX: &str = "ground:";
const PHOTO_COUNT_PREFIX: &str = "photo_count:";
const EDISON_QUEUE: &str = "edison:queue";
const EDISON_ENABLED: &str = "edison:enabled";
const REALTIME_CURSOR: &str = "realtime:cursor";

const NOT_FRIEND_MESSAGE: &str = "Please add the COSCUP bot as a friend first";

/// Bot logic backed by a local store
pub struct LocalCoscupBot {
    bot_type: BotType,
    validator: SignatureValidator,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn Store>,
    roster: SponsorRoster,
    sheet: SheetCredentials,
    sheet_data: RwLock<SheetData>,
    wit_tokens: WitTokens,
    redis_url: String,
    /// Held across read-modify-write sequences on per-user state
    update_lock: Mutex<()>,
}

impl LocalCoscupBot {
    pub fn new(
        config: &Config,
        validator: SignatureValidator,
        messenger: Arc<dyn Messenger>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            bot_type: config.bot_type,
            validator,
            messenger,
            store,
            roster: SponsorRoster::default_roster().clone(),
            sheet: config.sheet.clone(),
            sheet_data: RwLock::new(SheetData::default()),
            wit_tokens: config.wit_tokens.clone(),
            redis_url: config.redis_url.clone(),
            update_lock: Mutex::new(()),
        }
    }

    pub fn with_roster(mut self, roster: SponsorRoster) -> Self {
        self.roster = roster;
        self
    }

    async fn friends(&self) -> Result<Vec<String>, BotError> {
        let keys = self.store.keys(FRIEND_PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(FRIEND_PREFIX).map(str::to_string))
            .collect())
    }

    async fn is_edison_enabled(&self) -> Result<bool, BotError> {
        Ok(self.store.get(EDISON_ENABLED).await?.as_deref() != Some("0"))
    }

    async fn photo_count(&self, mid: &str) -> Result<u32, BotError> {
        let key = format!("{}{}", PHOTO_COUNT_PREFIX, mid);
        Ok(self.store
            .get(&key)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    async fn load_ground(&self, mid: &str) -> Result<GroundStatus, BotError> {
        let mut status: GroundStatus = self.roster
            .ids()
            .map(|id| (id.to_string(), false))
            .collect();

        if let Some(saved) = self.store.get(&format!("{}{}", GROUND_PREFIX, mid)).await? {
            let saved: GroundStatus = serde_json::from_str(&saved)?;
            for (id, checked) in saved {
                if let Some(entry) = status.get_mut(&id) {
                    *entry = checked;
                }
            }
        }
        Ok(status)
    }

    /// Send a reply, logging failures instead of failing the event
    async fn answer(&self, event: &Event, to: &str, text: &str) {
        let result = match event.reply_token.as_deref() {
            Some(token) => self.messenger.reply_text(token, to, text).await,
            None => self.messenger.push_text(to, text).await,
        };
        if let Err(e) = result {
            tracing::warn!("Failed to answer {}: {}", to, e);
        }
    }

    async fn handle_event(&self, event: &Event) -> Result<(), BotError> {
        let Some(mid) = event.user_id() else {
            tracing::debug!("Ignoring {} event without user source", event.kind);
            return Ok(());
        };

        match event.kind.as_str() {
            "follow" => {
                self.store.set(&format!("{}{}", FRIEND_PREFIX, mid), "1").await?;
                tracing::info!("New friend: {}", mid);
                self.answer(event, mid, "Welcome to COSCUP!").await;
            }
            "unfollow" => {
                self.store.delete(&format!("{}{}", FRIEND_PREFIX, mid)).await?;
                tracing::info!("Friend left: {}", mid);
            }
            "message" => {
                let text = event.text().unwrap_or_default().trim().to_lowercase();
                if PHOTO_KEYWORDS.contains(&text.as_str()) {
                    let reply = self.request_photo(mid).await?;
                    self.answer(event, mid, reply).await;
                } else {
                    tracing::debug!("[{}] {}", mid, text);
                }
            }
            other => tracing::debug!("Unhandled event type: {}", other),
        }
        Ok(())
    }

    async fn request_photo(&self, mid: &str) -> Result<&'static str, BotError> {
        if !self.is_edison_enabled().await? {
            return Ok("Taking photos is not available right now.");
        }

        let _guard = self.update_lock.lock().await;
        let count = self.photo_count(mid).await?;
        if count >= MAX_TAKE_PHOTO {
            return Ok("You have used all of your photos.");
        }

        let request = serde_json::to_string(&PhotoRequest::new(mid))?;
        self.store.push_back(EDISON_QUEUE, &request).await?;
        self.store
            .set(&format!("{}{}", PHOTO_COUNT_PREFIX, mid), &(count + 1).to_string())
            .await?;
        tracing::info!("Queued photo request for {} ({}/{})", mid, count + 1, MAX_TAKE_PHOTO);

        Ok("Your photo is queued, please look at the camera.")
    }
}

#[async_trait]
impl CoscupBot for LocalCoscupBot {
    fn validate_signature(&self, body: &[u8], signature: &str) -> bool {
        self.validator.validate(body, signature)
    }

    async fn process_new_event(&self, body: &str) -> Result<(), BotError> {
        let webhook = WebhookBody::parse(body)?;
        for event in &webhook.events {
            self.handle_event(event).await?;
        }
        Ok(())
    }

    async fn get_edison_request(&self) -> Result<Option<String>, BotError> {
        Ok(self.store.pop_front(EDISON_QUEUE).await?)
    }

    async fn take_photo_done(&self, body: &str) -> Result<(), BotError> {
        let done: PhotoDone = serde_json::from_str(body)?;
        tracing::info!("Photo for {} ready at {}", done.mid, done.url);

        let text = format!("Your photo is ready: {}", done.url);
        if let Err(e) = self.messenger.push_text(&done.mid, &text).await {
            tracing::warn!("Failed to deliver photo to {}: {}", done.mid, e);
        }
        Ok(())
    }

    async fn broadcast_realtime_message(&self) -> Result<usize, BotError> {
        let messages = self.sheet_data.read().await.realtime.clone();
        if messages.is_empty() {
            tracing::info!("No realtime messages synced, nothing to broadcast");
            return Ok(0);
        }

        let cursor: usize = {
            let _guard = self.update_lock.lock().await;
            let cursor = self.store
                .get(REALTIME_CURSOR)
                .await?
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            self.store.set(REALTIME_CURSOR, &(cursor + 1).to_string()).await?;
            cursor
        };
        let text = &messages[cursor % messages.len()];

        let mut sent = 0;
        for mid in self.friends().await? {
            match self.messenger.push_text(&mid, text).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!("Broadcast to {} failed: {}", mid, e),
            }
        }
        tracing::info!("Broadcast realtime message to {} friends", sent);
        Ok(sent)
    }

    async fn sync_backend_data(&self) -> Result<bool, BotError> {
        match load_sheet(&self.sheet.path, &self.sheet.name).await {
            Ok(data) => {
                tracing::info!("Synced sheet '{}': {} realtime messages", self.sheet.name, data.realtime.len());
                *self.sheet_data.write().await = data;
                self.store.delete(REALTIME_CURSOR).await?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Sheet sync failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn clear_take_photo_count(&self, mid: &str) -> Result<(), BotError> {
        let _guard = self.update_lock.lock().await;
        self.store.delete(&format!("{}{}", PHOTO_COUNT_PREFIX, mid)).await?;
        Ok(())
    }

    async fn clear_ground_data(&self, mid: &str) -> Result<(), BotError> {
        let _guard = self.update_lock.lock().await;
        self.store.delete(&format!("{}{}", GROUND_PREFIX, mid)).await?;
        Ok(())
    }

    async fn get_ground_game_status(&self, mid: &str) -> Result<GroundStatus, BotError> {
        self.load_ground(mid).await
    }

    async fn ground_game_check_in(&self, sp_id: &str, mid: &str) -> Result<CheckInResult, BotError> {
        if !self.is_bot_friend(mid).await? {
            return Ok(CheckInResult::failed(NOT_FRIEND_MESSAGE));
        }
        if !self.roster.contains(sp_id) {
            return Ok(CheckInResult::failed(format!("Unknown sponsor: {}", sp_id)));
        }

        let _guard = self.update_lock.lock().await;
        let mut status = self.load_ground(mid).await?;
        status.insert(sp_id.to_string(), true);
        self.store
            .set(&format!("{}{}", GROUND_PREFIX, mid), &serde_json::to_string(&status)?)
            .await?;
        tracing::info!("{} checked in at {}", mid, sp_id);

        Ok(CheckInResult::ok(status))
    }

    async fn get_status(&self) -> Result<serde_json::Value, BotError> {
        let languages: Vec<&String> = self.wit_tokens.keys().collect();
        Ok(serde_json::json!({
            "bot_type": self.bot_type,
            "edison_enabled": self.is_edison_enabled().await?,
            "pending_photo_requests": self.store.len(EDISON_QUEUE).await?,
            "friends": self.friends().await?.len(),
            "realtime_messages": self.sheet_data.read().await.realtime.len(),
            "languages": languages,
            "redis": self.redis_url,
        }))
    }

    async fn is_bot_friend(&self, mid: &str) -> Result<bool, BotError> {
        Ok(self.store.get(&format!("{}{}", FRIEND_PREFIX, mid)).await?.is_some())
    }

    async fn disable_take_photo(&self) -> Result<(), BotError> {
        self.store.set(EDISON_ENABLED, "0").await?;
        tracing::info!("Taking photos disabled");
        Ok(())
    }

    async fn enable_take_photo(&self) -> Result<(), BotError> {
        self.store.set(EDISON_ENABLED, "1").await?;
        tracing::info!("Taking photos enabled");
        Ok(())
    }
}
