//! LINE Messaging API adapter

use async_trait::async_trait;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::application::errors::BotError;
use crate::domain::traits::Messenger;
use crate::infrastructure::config::Credentials;

/// Messaging API base URL (BUSINESS channels)
const API_BASE: &str = "https://api.line.me";
/// BOT API trial endpoint (TRIAL channels)
const TRIAL_EVENTS_URL: &str = "https://trialbot-api.line.me/v1/events";
const TRIAL_TO_CHANNEL: u64 = 1383378250;
const TRIAL_SEND_MESSAGE_EVENT: &str = "138311608800106203";

/// Webhook delivery
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: Option<String>,
    pub source: Option<Source>,
    pub message: Option<EventMessage>,
}

impl Event {
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.text.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub text: Option<String>,
}

impl WebhookBody {
    pub fn parse(body: &str) -> Result<Self, BotError> {
        serde_json::from_str(body).map_err(|e| BotError::Parse(format!("Invalid webhook body: {}", e)))
    }
}

/// Validates `X-Line-Signature`: base64(HMAC-SHA256(channel secret, body))
#[derive(Clone)]
pub struct SignatureValidator {
    channel_secret: String,
}

impl SignatureValidator {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    pub fn validate(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature.trim()) else {
            return false;
        };

        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };
        mac.update(body);

        // Constant-time comparison
        mac.verify_slice(&expected).is_ok()
    }

    /// Signature the platform would send for `body`
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = match Hmac::<Sha256>::new_from_slice(self.channel_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(body);
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// LINE channel client
pub struct LineClient {
    credentials: Credentials,
    client: Client,
}

impl LineClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            client: Client::new(),
        }
    }

    /// Validator for webhooks delivered to this channel
    pub fn signature_validator(&self) -> SignatureValidator {
        SignatureValidator::new(self.credentials.channel_secret())
    }

    /// Get the API URL for a Messaging API path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{}", API_BASE, path)
    }

    /// Answer a webhook event. Trial channels have no reply API and push instead.
    pub async fn send_reply(&self, reply_token: &str, to: &str, text: &str) -> Result<(), BotError> {
        match &self.credentials {
            Credentials::Business { channel_token, .. } => {
                #[derive(Serialize)]
                #[serde(rename_all = "camelCase")]
                struct ReplyRequest<'a> {
                    reply_token: &'a str,
                    messages: Vec<TextMessage<'a>>,
                }

                let request = ReplyRequest {
                    reply_token,
                    messages: vec![TextMessage::new(text)],
                };
                let response = self.client
                    .post(self.api_url("message/reply"))
                    .bearer_auth(channel_token)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| BotError::Network(e.to_string()))?;

                check_status(response, "reply").await
            }
            Credentials::Trial { .. } => self.send_push(to, text).await,
        }
    }

    /// Push a text message to one user
    pub async fn send_push(&self, to: &str, text: &str) -> Result<(), BotError> {
        tracing::debug!("Pushing to {}: {}", to, text);

        let request = match &self.credentials {
            Credentials::Business { channel_token, .. } => {
                #[derive(Serialize)]
                struct PushRequest<'a> {
                    to: &'a str,
                    messages: Vec<TextMessage<'a>>,
                }

                self.client
                    .post(self.api_url("message/push"))
                    .bearer_auth(channel_token)
                    .json(&PushRequest {
                        to,
                        messages: vec![TextMessage::new(text)],
                    })
            }
            Credentials::Trial { channel_id, channel_secret, channel_mid } => {
                #[derive(Serialize)]
                #[serde(rename_all = "camelCase")]
                struct TrialContent<'a> {
                    content_type: u8,
                    to_type: u8,
                    text: &'a str,
                }

                #[derive(Serialize)]
                #[serde(rename_all = "camelCase")]
                struct TrialEvent<'a> {
                    to: Vec<&'a str>,
                    to_channel: u64,
                    event_type: &'a str,
                    content: TrialContent<'a>,
                }

                self.client
                    .post(TRIAL_EVENTS_URL)
                    .header("X-Line-ChannelID", channel_id.as_str())
                    .header("X-Line-ChannelSecret", channel_secret.as_str())
                    .header("X-Line-Trusted-User-With-ACL", channel_mid.as_str())
                    .json(&TrialEvent {
                        to: vec![to],
                        to_channel: TRIAL_TO_CHANNEL,
                        event_type: TRIAL_SEND_MESSAGE_EVENT,
                        content: TrialContent {
                            content_type: 1,
                            to_type: 1,
                            text,
                        },
                    })
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        check_status(response, "push").await
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply_text(&self, reply_token: &str, to: &str, text: &str) -> Result<(), BotError> {
        self.send_reply(reply_token, to, text).await
    }

    async fn push_text(&self, to: &str, text: &str) -> Result<(), BotError> {
        self.send_push(to, text).await
    }
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    fn new(text: &'a str) -> Self {
        Self { kind: "text", text }
    }
}

async fn check_status(response: reqwest::Response, call: &str) -> Result<(), BotError> {
    if response.status().is_success() {
        return Ok(());
    }
    let status = response.status();
    let error = response.text().await.unwrap_or_default();
    Err(BotError::Network(format!("LINE {} failed ({}): {}", call, status, error)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_roundtrip() {
        let validator = SignatureValidator::new("channel-secret");
        let body = br#"{"events":[]}"#;
        let signature = validator.sign(body);

        assert!(validator.validate(body, &signature));
        assert!(!validator.validate(b"tampered", &signature));
    }

    #[test]
    fn test_signature_rejects_garbage() {
        let validator = SignatureValidator::new("channel-secret");
        assert!(!validator.validate(b"{}", ""));
        assert!(!validator.validate(b"{}", "not base64!"));
        assert!(!validator.validate(b"{}", &SignatureValidator::new("other").sign(b"{}")));
    }

    #[test]
    fn test_parse_webhook_events() {
        let body = r#"{
            "events": [
                {"type": "follow", "replyToken": "r1", "source": {"type": "user", "userId": "U1"}},
                {"type": "message", "replyToken": "r2", "source": {"type": "user", "userId": "U2"},
                 "message": {"type": "text", "id": "100", "text": "photo"}}
            ]
        }"#;
        let parsed = WebhookBody::parse(body).unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.events[0].kind, "follow");
        assert_eq!(parsed.events[0].user_id(), Some("U1"));
        assert_eq!(parsed.events[1].text(), Some("photo"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(WebhookBody::parse("not json"), Err(BotError::Parse(_))));
    }
}
