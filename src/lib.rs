//! COSCUP LINE bot server
//!
//! Webhook ingress, admin endpoints and sponsor check-in pages in front of
//! the bot logic.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::errors::{BotError, ConfigError};
pub use domain::traits::CoscupBot;
pub use infrastructure::adapters::http::{router, AppContext};
pub use infrastructure::config::Config;
