use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user ground game progress: sponsor id -> checked in
pub type GroundStatus = BTreeMap<String, bool>;

/// Outcome of a sponsor check-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub status: GroundStatus,
}

impl CheckInResult {
    pub fn ok(status: GroundStatus) -> Self {
        Self { error: None, status }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            status: GroundStatus::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_omitted_when_absent() {
        let mut status = GroundStatus::new();
        status.insert("sp01".to_string(), true);
        let json = serde_json::to_value(CheckInResult::ok(status)).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["status"]["sp01"], true);
    }

    #[test]
    fn test_failed_result() {
        let result = CheckInResult::failed("not a friend");
        assert!(result.is_error());
        assert!(result.status.is_empty());
    }
}
