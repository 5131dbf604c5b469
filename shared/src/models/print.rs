//! Print dispatch DTOs
//!
//! Shapes exchanged with `POST /api/print` and the auxiliary printer and
//! health endpoints.

use crate::models::label::LabelSettings;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/print`
///
/// Assembled at the moment printing is triggered: `printer_name` omitted
/// lets the server fall back to its default printer, and `label_settings`
/// reflects the settings store as of that instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub file_id: String,
    pub page_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_name: Option<String>,
    pub label_settings: LabelSettings,
    pub username: String,
}

/// Print submission outcome mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    /// A physical print was performed or queued
    Print,
    /// No physical print; the server returned a viewable location instead
    Preview,
}

/// Response of `POST /api/print`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PrintMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintResponse {
    /// Server-reported failure reason, falling back to the message field
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown print error".to_string())
    }
}

/// Response of `GET /api/printers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterList {
    #[serde(default)]
    pub printers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_printer: Option<String>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_request_omits_absent_printer() {
        let request = PrintRequest {
            file_id: "ab12".into(),
            page_num: 3,
            printer_name: None,
            label_settings: LabelSettings::default(),
            username: "Anonymous".into(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("printer_name").is_none());
        assert_eq!(value["page_num"], 3);
        // Wire uses the frontend's camelCase offset keys
        assert!(value["label_settings"].get("offsetX").is_some());
    }

    #[test]
    fn deserializes_preview_response() {
        let json = r#"{
            "success": true,
            "mode": "preview",
            "message": "preview generated (no physical print)",
            "preview_url": "/api/preview/ab12/3"
        }"#;

        let resp: PrintResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.mode, Some(PrintMode::Preview));
        assert_eq!(resp.preview_url.as_deref(), Some("/api/preview/ab12/3"));
    }

    #[test]
    fn failure_reason_prefers_error_field() {
        let resp: PrintResponse =
            serde_json::from_str(r#"{"success": false, "error": "printer offline"}"#).unwrap();
        assert_eq!(resp.failure_reason(), "printer offline");

        let resp: PrintResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(resp.failure_reason(), "unknown print error");
    }
}
