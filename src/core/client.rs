use crate::config::IdentifyConfig;
use crate::core::request::PreparedRequest;
use crate::domain::model::IdentificationResponse;
use crate::domain::ports::IdentificationApi;
use crate::utils::error::{IdentifyError, Result};
use reqwest::Client;

/// Pl@ntNet identify client. One call per request, never retried.
pub struct PlantNetClient {
    client: Client,
}

impl PlantNetClient {
    pub fn new(config: &IdentifyConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| IdentifyError::InvalidConfigValue {
            field: "timeout_seconds".to_string(),
            value: format!("{:?}", config.timeout_seconds),
            reason: format!("HTTP client could not be created: {}", e),
        })?;

        Ok(Self { client })
    }
}

fn transport_error(e: reqwest::Error) -> IdentifyError {
    let message = if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };

    IdentifyError::Transport {
        status: e.status().map(|s| s.as_u16()),
        message,
        body: None,
    }
}

#[async_trait::async_trait]
impl IdentificationApi for PlantNetClient {
    async fn identify(&self, request: PreparedRequest) -> Result<IdentificationResponse> {
        tracing::debug!("Making API request to: {}", request.redacted_url());
        let (url, form) = request.into_multipart()?;

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        // Body may be unreadable after a failure; keep whatever arrived.
        let body = response.text().await.ok();

        if !status.is_success() {
            tracing::warn!("API returned {}: {}", status, body.as_deref().unwrap_or(""));
            return Err(IdentifyError::Transport {
                status: Some(status.as_u16()),
                message: format!("HTTP status {}", status),
                body,
            });
        }

        let body = body.ok_or_else(|| IdentifyError::InvalidResponse {
            message: "response body could not be read".to_string(),
            body: None,
        })?;

        let parsed: IdentificationResponse =
            serde_json::from_str(&body).map_err(|e| IdentifyError::InvalidResponse {
                message: e.to_string(),
                body: Some(body.clone()),
            })?;

        if let Some(best) = &parsed.best_match {
            tracing::debug!("API best match: {}", best);
        }
        if let Some(remaining) = parsed.remaining_identification_requests {
            tracing::info!("Remaining identification requests today: {}", remaining);
        }
        tracing::debug!("API returned {} candidate(s)", parsed.results.len());

        Ok(parsed)
    }
}
