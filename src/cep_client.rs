use crate::errors::AppError;
use crate::models::ApiCepResponse;
use std::time::Duration;

/// Client for the public CEP lookup API (apicep).
///
/// Each lookup is a single GET with the configured timeout. No retries, no caching.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl CepClient {
    /// Creates a new `CepClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the CEP API, without trailing slash.
    /// * `timeout` - Upper bound for the whole request, connect included.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create CEP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Looks up the address of a CEP already normalized to `XXXXX-XXX`.
    ///
    /// Transport failures, timeouts, non-success statuses and unparseable
    /// bodies all come back as `AppError::UpstreamUnavailable`.
    pub async fn lookup(&self, cep: &str) -> Result<ApiCepResponse, AppError> {
        let url = format!("{}/{}.json", self.base_url, cep);
        tracing::info!("Fetching address for CEP {}: {}", cep, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamUnavailable(format!("CEP request timed out: {}", e))
            } else {
                AppError::UpstreamUnavailable(format!("CEP request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamUnavailable(format!(
                "CEP API returned {}: {}",
                status, error_text
            )));
        }

        let endereco: ApiCepResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse CEP response: {}", e))
        })?;

        tracing::info!("Address found for CEP {}", cep);
        Ok(endereco)
    }
}
