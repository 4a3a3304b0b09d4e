//! Administrative endpoints, mounted behind Basic auth
//!
//! Each handler calls exactly one bot method and formats its result.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};

use super::AppContext;
use crate::application::errors::BotError;
use crate::domain::entities::{CheckInResult, GroundStatus};

const OK: &str = "OK";
const FAIL: &str = "FAIL";

/// GET /edison - next photo request, `{}` when the queue is empty
pub async fn edison(State(ctx): State<AppContext>) -> Result<impl IntoResponse, BotError> {
    let body = ctx.bot
        .get_edison_request()
        .await?
        .unwrap_or_else(|| "{}".to_string());
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// POST /edisondone
pub async fn edison_done(State(ctx): State<AppContext>, body: String) -> Result<&'static str, BotError> {
    ctx.bot.take_photo_done(&body).await?;
    Ok(OK)
}

/// GET /triggerrealtime
pub async fn trigger_realtime(State(ctx): State<AppContext>) -> Result<String, BotError> {
    let sent = ctx.bot.broadcast_realtime_message().await?;
    Ok(sent.to_string())
}

/// GET /syncbackend
pub async fn sync_backend(State(ctx): State<AppContext>) -> Result<&'static str, BotError> {
    let synced = ctx.bot.sync_backend_data().await?;
    Ok(if synced { OK } else { FAIL })
}

pub async fn clear_take_photo_count(
    State(ctx): State<AppContext>,
    Path(mid): Path<String>,
) -> Result<&'static str, BotError> {
    ctx.bot.clear_take_photo_count(&mid).await?;
    Ok(OK)
}

pub async fn clear_ground_data(
    State(ctx): State<AppContext>,
    Path(mid): Path<String>,
) -> Result<&'static str, BotError> {
    ctx.bot.clear_ground_data(&mid).await?;
    Ok(OK)
}

pub async fn ground_status(
    State(ctx): State<AppContext>,
    Path(mid): Path<String>,
) -> Result<Json<GroundStatus>, BotError> {
    Ok(Json(ctx.bot.get_ground_game_status(&mid).await?))
}

pub async fn ground_check_in(
    State(ctx): State<AppContext>,
    Path((sp_id, mid)): Path<(String, String)>,
) -> Result<Json<CheckInResult>, BotError> {
    Ok(Json(ctx.bot.ground_game_check_in(&sp_id, &mid).await?))
}

pub async fn status(State(ctx): State<AppContext>) -> Result<Json<serde_json::Value>, BotError> {
    Ok(Json(ctx.bot.get_status().await?))
}

pub async fn is_friend(
    State(ctx): State<AppContext>,
    Path(mid): Path<String>,
) -> Result<Json<bool>, BotError> {
    Ok(Json(ctx.bot.is_bot_friend(&mid).await?))
}

pub async fn disable_edison(State(ctx): State<AppContext>) -> Result<&'static str, BotError> {
    ctx.bot.disable_take_photo().await?;
    Ok(OK)
}

pub async fn enable_edison(State(ctx): State<AppContext>) -> Result<&'static str, BotError> {
    ctx.bot.enable_take_photo().await?;
    Ok(OK)
}
