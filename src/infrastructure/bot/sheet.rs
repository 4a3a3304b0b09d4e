//! Spreadsheet snapshot loading
//!
//! The backend spreadsheet is exported to a YAML file keyed by worksheet
//! name. Only the realtime announcements are read by the bot.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::application::errors::BotError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SheetData {
    /// Announcements pushed by `/triggerrealtime`, in order
    #[serde(default)]
    pub realtime: Vec<String>,
}

pub async fn load_sheet(path: &Path, name: &str) -> Result<SheetData, BotError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read sheet {}: {}", path.display(), e)))?;

    let mut sheets: HashMap<String, SheetData> = serde_yaml::from_str(&content)
        .map_err(|e| BotError::Parse(format!("Failed to parse sheet: {}", e)))?;

    sheets
        .remove(name)
        .ok_or_else(|| BotError::NotFound(format!("worksheet '{}'", name)))
}
