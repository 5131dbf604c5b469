//! Barcode scan lookup DTOs
//!
//! Shapes returned by `GET /api/scan/<barcode>` on the print-server.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A resolved association between a barcode and a document page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeMapping {
    pub file_id: String,
    pub page_num: u32,
    pub doc_name: String,
}

/// A prior successful print of the matched page
///
/// The server emits naive local ISO timestamps (no offset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintRecord {
    pub timestamp: NaiveDateTime,
    pub printer: String,
}

/// Response of `GET /api/scan/<barcode>`
///
/// `found = false` with `success = true` means the lookup worked but no
/// uploaded document contains the barcode. `print_count` and `last_print`
/// are only populated alongside a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BarcodeMapping>,
    #[serde(default)]
    pub print_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_print: Option<PrintRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScanResponse {
    /// Whether this response carries a usable match
    pub fn matched(&self) -> bool {
        self.success && self.found && self.mapping.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_found_response() {
        // Captured shape of a successful /api/scan reply
        let json = r#"{
            "success": true,
            "found": true,
            "matched_barcode": "4006381333931",
            "mapping": {"file_id": "ab12", "page_num": 7, "doc_name": "labels.pdf"},
            "print_count": 2,
            "last_print": {"timestamp": "2026-03-14T09:26:53.589", "printer": "Zebra-GK420d"}
        }"#;

        let resp: ScanResponse = serde_json::from_str(json).unwrap();
        assert!(resp.matched());
        assert_eq!(resp.print_count, 2);
        let mapping = resp.mapping.unwrap();
        assert_eq!(mapping.page_num, 7);
        assert_eq!(resp.last_print.unwrap().printer, "Zebra-GK420d");
    }

    #[test]
    fn deserializes_not_found_response() {
        let json = r#"{"success": true, "found": false, "message": "Barcode not found"}"#;

        let resp: ScanResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.matched());
        assert_eq!(resp.print_count, 0);
        assert!(resp.mapping.is_none());
        assert!(resp.last_print.is_none());
    }
}
