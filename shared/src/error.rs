//! Workflow error kinds
//!
//! Errors surfaced to the operator by the scan workflow. All of them are
//! recoverable: the operator retries by scanning again or re-triggering
//! the print. Retries are never automatic.

use thiserror::Error;

/// Operator-facing workflow error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Lookup succeeded but no document page matches the barcode
    #[error("Barcode not found in any uploaded document")]
    NotFound,

    /// Lookup or print transport failed
    #[error("Could not reach the print server")]
    Connectivity,

    /// Print service accepted the request but reported failure
    #[error("Print failed: {0}")]
    PrintFailed(String),
}
