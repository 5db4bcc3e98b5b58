//! Hosted inference backend (Hugging Face Inference API compatible).

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Fixed timeout applied to every hosted inference call.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a hosted summarization model.
///
/// Every failure mode (transport, timeout, non-success status, unexpected body) is reported as
/// an error so the caller can fall back to the local model.
pub struct RemoteSummarizationClient {
    http: Client,
    endpoint: String,
    model: String,
    token: String,
}

impl RemoteSummarizationClient {
    /// Build a client for `model` served under `api_url`.
    pub fn new(api_url: &str, model: &str, token: &str) -> Result<Self, SummarizationClientError> {
        Self::with_timeout(api_url, model, token, REMOTE_TIMEOUT)
    }

    /// Build a client with a custom request timeout.
    pub fn with_timeout(
        api_url: &str,
        model: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("study-helper/remote")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            endpoint: format!("{}/models/{}", api_url.trim_end_matches('/'), model),
            model: model.to_string(),
            token: token.to_string(),
        })
    }
}

/// Summarization models reply with `[{"summary_text": "..."}]`.
#[derive(Debug, Deserialize)]
struct RemoteSummary {
    summary_text: String,
}

#[async_trait]
impl SummarizationClient for RemoteSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": request.max_len,
                "min_length": request.min_len,
                "do_sample": false,
            }
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                let reason = if error.is_timeout() {
                    "timed out"
                } else {
                    "request failed"
                };
                SummarizationClientError::ProviderUnavailable(format!(
                    "{} {reason}: {error}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(SummarizationClientError::ModelLoading(format!(
                "{} is not ready yet",
                self.model
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "inference endpoint returned {status}: {body}"
            )));
        }

        let body: Vec<RemoteSummary> = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "unexpected inference response shape: {error}"
            ))
        })?;

        body.into_iter()
            .next()
            .map(|summary| summary.summary_text.trim().to_string())
            .filter(|summary| !summary.is_empty())
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("inference returned no summary".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn request() -> SummarizationRequest {
        SummarizationRequest {
            text: "A long passage about Rust ownership.".into(),
            max_len: 160,
            min_len: 60,
        }
    }

    #[tokio::test]
    async fn remote_client_returns_summary_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/facebook/bart-large-cnn")
                    .header("authorization", "Bearer hf_test")
                    .json_body(json!({
                        "inputs": "A long passage about Rust ownership.",
                        "parameters": {"max_length": 160, "min_length": 60, "do_sample": false}
                    }));
                then.status(200)
                    .json_body(json!([{ "summary_text": " Rust tracks ownership. " }]));
            })
            .await;

        let client =
            RemoteSummarizationClient::new(&server.base_url(), "facebook/bart-large-cnn", "hf_test")
                .expect("client");
        let summary = client.generate_summary(request()).await.expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "Rust tracks ownership.");
    }

    #[tokio::test]
    async fn remote_client_reports_model_loading() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/m");
                then.status(503)
                    .json_body(json!({ "error": "Model m is currently loading" }));
            })
            .await;

        let client = RemoteSummarizationClient::new(&server.base_url(), "m", "t").expect("client");
        let error = client.generate_summary(request()).await.unwrap_err();
        assert!(matches!(error, SummarizationClientError::ModelLoading(_)));
    }

    #[tokio::test]
    async fn remote_client_rejects_unexpected_shape() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/m");
                then.status(200).json_body(json!({ "generated_text": "nope" }));
            })
            .await;

        let client = RemoteSummarizationClient::new(&server.base_url(), "m", "t").expect("client");
        let error = client.generate_summary(request()).await.unwrap_err();
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn remote_client_rejects_blank_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/m");
                then.status(200).json_body(json!([{ "summary_text": "   " }]));
            })
            .await;

        let client = RemoteSummarizationClient::new(&server.base_url(), "m", "t").expect("client");
        let error = client.generate_summary(request()).await.unwrap_err();
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn remote_client_maps_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/m");
                then.status(429).body("rate limited");
            })
            .await;

        let client = RemoteSummarizationClient::new(&server.base_url(), "m", "t").expect("client");
        let error = client.generate_summary(request()).await.unwrap_err();
        assert!(
            matches!(error, SummarizationClientError::GenerationFailed(ref message) if message.contains("429"))
        );
    }

    #[tokio::test]
    async fn remote_client_treats_timeout_as_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/m");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!([{ "summary_text": "late" }]));
            })
            .await;

        let client = RemoteSummarizationClient::with_timeout(
            &server.base_url(),
            "m",
            "t",
            Duration::from_millis(50),
        )
        .expect("client");
        let error = client.generate_summary(request()).await.unwrap_err();
        assert!(matches!(error, SummarizationClientError::ProviderUnavailable(_)));
    }
}
