//! HTTP client for print-server API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{Health, PrintRequest, PrintResponse, PrinterList, ScanResponse};

/// HTTP client for making network requests to the print-server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Server base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %text, "print-server returned an error status");
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(text)),
                _ => Err(ClientError::Server(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Print-server API ==========

    /// Check server availability
    pub async fn health(&self) -> ClientResult<Health> {
        self.get("/health").await
    }

    /// List printers known to the server
    pub async fn printers(&self) -> ClientResult<PrinterList> {
        self.get("/api/printers").await
    }

    /// Resolve a barcode to a document page match
    pub async fn scan_barcode(&self, code: &str) -> ClientResult<ScanResponse> {
        self.get(&format!("/api/scan/{code}")).await
    }

    /// Submit a print job
    pub async fn print_label(&self, request: &PrintRequest) -> ClientResult<PrintResponse> {
        self.post("/api/print", request).await
    }

    /// Absolute URL of the rendered preview for a document page
    ///
    /// The preview is opened by the caller, never fetched through this
    /// client.
    pub fn preview_url(&self, file_id: &str, page_num: u32) -> String {
        format!("{}/api/preview/{file_id}/{page_num}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_url_is_absolute() {
        let client = ClientConfig::new("http://localhost:5001/").build();
        assert_eq!(
            client.preview_url("ab12", 7),
            "http://localhost:5001/api/preview/ab12/7"
        );
    }
}
