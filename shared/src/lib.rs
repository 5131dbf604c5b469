//! Shared types for the labelscan workstation
//!
//! Wire DTOs for the print-server REST API and the workflow error kinds,
//! used across the client, workflow, and station crates.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::WorkflowError;
pub use models::label::{ColorMode, LabelSettings, Resampling};
pub use models::print::{Health, PrintMode, PrintRequest, PrintResponse, PrinterList};
pub use models::scan::{BarcodeMapping, PrintRecord, ScanResponse};
