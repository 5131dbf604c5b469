//! labelscan-client - HTTP client for the print-server
//!
//! Provides typed network calls to the print-server REST API: barcode
//! lookup, print dispatch, printer discovery, and health checks.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{Health, PrintRequest, PrintResponse, PrinterList, ScanResponse};
