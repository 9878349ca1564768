//! Envelope — the JSON body of `GET /api/widget/{name}`.

use serde::{Deserialize, Serialize};

/// Status value marking a successful envelope.
pub const SUCCESS: &str = "success";

/// Status value used for failures produced by this server.
pub const ERROR: &str = "error";

/// Wire format of a widget data response.
///
/// Any `status` other than `"success"` is a failure carrying `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetEnvelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WidgetEnvelope {
    #[must_use]
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: SUCCESS.to_string(),
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ERROR.to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_recognize_success_status_only() {
        assert!(WidgetEnvelope::success(serde_json::json!({})).is_success());
        assert!(!WidgetEnvelope::failure("boom").is_success());

        let other: WidgetEnvelope =
            serde_json::from_str(r#"{"status":"failure","message":"X"}"#).unwrap();
        assert!(!other.is_success());
        assert_eq!(other.message.as_deref(), Some("X"));
    }

    #[test]
    fn should_omit_absent_fields_when_serializing() {
        let json = serde_json::to_value(WidgetEnvelope::failure("Widget not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Widget not found"})
        );
    }

    #[test]
    fn should_parse_envelope_without_data_or_message() {
        let env: WidgetEnvelope = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(env.is_success());
        assert!(env.data.is_none());
    }
}
