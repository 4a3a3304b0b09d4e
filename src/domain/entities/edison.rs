use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending photo for the Edison booth camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRequest {
    pub mid: String,
    pub requested_at: DateTime<Utc>,
}

impl PhotoRequest {
    pub fn new(mid: impl Into<String>) -> Self {
        Self {
            mid: mid.into(),
            requested_at: Utc::now(),
        }
    }
}

/// Report posted by the camera once a photo is uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDone {
    pub mid: String,
    pub url: String,
}
