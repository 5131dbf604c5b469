//! Collaborator seams
//!
//! The workflow drives two external services through these traits: the
//! lookup service that resolves barcodes and the print service that
//! performs or queues the physical print. Transport mechanics belong to
//! the implementations (labelscan-client over HTTP, mocks in tests).

use async_trait::async_trait;
use shared::{PrintRequest, PrintResponse, ScanResponse};
use thiserror::Error;

/// Transport-level collaborator failure
///
/// Anything that prevented a response from arriving at all; the workflow
/// surfaces it as a connectivity error.
#[derive(Debug, Clone, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Resolves a barcode to a document/page match and prior print count
#[async_trait]
pub trait BarcodeLookup: Send + Sync + 'static {
    async fn scan(&self, code: &str) -> Result<ScanResponse, TransportError>;
}

/// Accepts a print request and performs or queues the physical print
#[async_trait]
pub trait PrintDispatch: Send + Sync + 'static {
    async fn submit(&self, request: &PrintRequest) -> Result<PrintResponse, TransportError>;
}
