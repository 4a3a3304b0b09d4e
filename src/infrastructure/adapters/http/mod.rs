//! HTTP server adapter
//!
//! One route table: the LINE webhook, the Basic-auth protected admin group
//! and the public sponsor pages. Handlers get an [`AppContext`] as router
//! state instead of reaching for globals.

pub mod admin;
pub mod auth;
pub mod sponsor;
pub mod webhook;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::errors::BotError;
use crate::domain::entities::SponsorRoster;
use crate::domain::traits::CoscupBot;
use crate::infrastructure::config::{AdminPrincipal, Config};

pub const GREETING: &str = "Hello, Coscup bot.";

/// State shared by every request
#[derive(Clone)]
pub struct AppContext {
    pub bot: Arc<dyn CoscupBot>,
    pub admin: Arc<AdminPrincipal>,
    /// Verify webhook signatures
    pub production: bool,
    pub static_dir: PathBuf,
    pub roster: Arc<SponsorRoster>,
}

impl AppContext {
    pub fn new(config: &Config, bot: Arc<dyn CoscupBot>) -> Self {
        Self {
            bot,
            admin: Arc::new(config.admin.clone()),
            production: config.server.production,
            static_dir: config.server.static_dir.clone(),
            roster: Arc::new(SponsorRoster::default_roster().clone()),
        }
    }
}

/// Build the full route table
pub fn router(ctx: AppContext) -> Router {
    let admin = Router::new()
        .route("/edison", get(admin::edison))
        .route("/edisondone", post(admin::edison_done))
        .route("/triggerrealtime", get(admin::trigger_realtime))
        .route("/syncbackend", get(admin::sync_backend))
        .route("/clearnumtakephoto/{mid}", get(admin::clear_take_photo_count))
        .route("/cleargrounddata/{mid}", get(admin::clear_ground_data))
        .route("/groundstatus/{mid}", get(admin::ground_status))
        .route("/groundcheckin/{sp_id}/{mid}", get(admin::ground_check_in))
        .route("/status", get(admin::status))
        .route("/isfriend/{mid}", get(admin::is_friend))
        .route("/disableedison", get(admin::disable_edison))
        .route("/enableedison", get(admin::enable_edison))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), auth::require_basic_auth));

    let img_dir = ctx.static_dir.join("img");
    let css_dir = ctx.static_dir.join("css");

    Router::new()
        .route("/", get(hello))
        .route("/callback", post(webhook::callback))
        .route("/sp/", get(sponsor::welcome))
        .route("/sp/test", get(sponsor::test_page))
        .route("/sp/{sp_id}", get(sponsor::entry))
        .route("/sp/{sp_id}/{mid}", get(sponsor::check_in))
        .nest_service("/sp/img", ServeDir::new(img_dir))
        .nest_service("/sp/css", ServeDir::new(css_dir))
        .merge(admin)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

async fn hello() -> &'static str {
    GREETING
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
