//! Print-server adapters
//!
//! Bind the workflow's collaborator seams to the HTTP client. Transport
//! failures become `TransportError` (surfaced as connectivity errors); an
//! error *status* from the print endpoint is a server-side rejection and
//! is reported as an unsuccessful print response instead.

use async_trait::async_trait;
use labelscan_client::{ClientError, HttpClient};
use labelscan_workflow::{BarcodeLookup, PrintDispatch, TransportError};
use shared::{PrintRequest, PrintResponse, ScanResponse};

/// The remote print-server, as seen by the workflow
#[derive(Debug, Clone)]
pub struct PrintServer {
    client: HttpClient,
}

impl PrintServer {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BarcodeLookup for PrintServer {
    async fn scan(&self, code: &str) -> Result<ScanResponse, TransportError> {
        self.client
            .scan_barcode(code)
            .await
            .map_err(|e| TransportError(e.to_string()))
    }
}

#[async_trait]
impl PrintDispatch for PrintServer {
    async fn submit(&self, request: &PrintRequest) -> Result<PrintResponse, TransportError> {
        match self.client.print_label(request).await {
            Ok(response) => Ok(response),
            Err(ClientError::Http(e)) => Err(TransportError(e.to_string())),
            Err(e) => Ok(PrintResponse {
                success: false,
                mode: None,
                message: None,
                preview_url: None,
                error: Some(e.to_string()),
            }),
        }
    }
}
