//! Public sponsor check-in pages

use axum::{
    extract::{Path, State},
    response::{Html, Json},
};

use super::AppContext;
use crate::application::errors::BotError;
use crate::application::services::CheckInService;
use crate::infrastructure::templates;

/// GET /sp/
pub async fn welcome(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the COSCUP sponsor ground game",
        "sponsors": ctx.roster.sponsors(),
    }))
}

/// GET /sp/test
pub async fn test_page() -> Html<String> {
    Html(templates::test_page())
}

/// GET /sp/{sp_id}
pub async fn entry(State(ctx): State<AppContext>, Path(sp_id): Path<String>) -> Html<String> {
    let booth = ctx.roster.booth_label(&sp_id).unwrap_or(&sp_id);
    Html(templates::entry_page(&sp_id, booth))
}

/// GET /sp/{sp_id}/{mid}
pub async fn check_in(
    State(ctx): State<AppContext>,
    Path((sp_id, mid)): Path<(String, String)>,
) -> Result<Html<String>, BotError> {
    let result = ctx.bot.ground_game_check_in(&sp_id, &mid).await?;
    let page = CheckInService::new(&ctx.roster).present(&sp_id, result);
    tracing::debug!("Check-in page for {} at {}: {:?}", mid, sp_id, page);
    Ok(Html(templates::check_in_page(&page)))
}
