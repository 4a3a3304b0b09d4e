//! Inbound LINE webhook

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use super::AppContext;

pub const SIGNATURE_HEADER: &str = "X-Line-Signature";
pub const ACK: &str = "OK";
pub const REJECTED: &str = "NOT PASS";

/// POST /callback
///
/// Always acknowledges the delivery: processing failures, panics included,
/// are logged and never surfaced to the platform. In production mode a
/// bad signature short-circuits with `NOT PASS`.
pub async fn callback(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> &'static str {
    if ctx.production {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !ctx.bot.validate_signature(&body, signature) {
            tracing::warn!(
                "Webhook signature verification failed (signature: {})",
                if signature.is_empty() { "missing" } else { "invalid" }
            );
            return REJECTED;
        }
    }

    let payload = String::from_utf8_lossy(&body).into_owned();
    tracing::debug!("Webhook payload: {}", payload);

    let bot = ctx.bot.clone();
    let outcome = tokio::spawn(async move { bot.process_new_event(&payload).await }).await;
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Failed to process webhook event: {}", e),
        Err(e) => tracing::error!("Webhook processing aborted: {}", e),
    }

    ACK
}
