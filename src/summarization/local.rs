//! Local model backend served by an Ollama runtime, plus the shared once-initialized handle.

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::OnceCell;

type ClientFactory =
    Arc<dyn Fn() -> Result<Arc<dyn SummarizationClient>, SummarizationClientError> + Send + Sync>;

/// Process-wide handle to the local model, created at most once on first use.
///
/// Clones share the same underlying cell, so concurrent first requests race on a single
/// initialization and every request afterwards reuses the same client.
#[derive(Clone)]
pub struct LocalModelHandle {
    factory: ClientFactory,
    cell: Arc<OnceCell<Arc<dyn SummarizationClient>>>,
}

impl LocalModelHandle {
    /// Handle backed by an Ollama runtime at `base_url` serving `model`.
    pub fn ollama(base_url: String, model: String) -> Self {
        Self::from_factory(move || {
            let client = LocalSummarizationClient::new(&base_url, &model)?;
            Ok(Arc::new(client) as Arc<dyn SummarizationClient>)
        })
    }

    /// Handle that builds its client with `factory` on first use.
    pub fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SummarizationClient>, SummarizationClientError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            factory: Arc::new(factory),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Handle wrapping an already constructed client.
    pub fn from_client(client: Arc<dyn SummarizationClient>) -> Self {
        Self::from_factory(move || Ok(Arc::clone(&client)))
    }

    /// Return the shared client, initializing it if this is the first call.
    ///
    /// A failed initialization leaves the cell empty so a later request can retry.
    pub async fn get(&self) -> Result<Arc<dyn SummarizationClient>, SummarizationClientError> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Initializing local summarization model");
                (self.factory)()
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Whether the local client has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

/// Client for a summarization model running in a local Ollama runtime.
pub struct LocalSummarizationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl LocalSummarizationClient {
    /// Build a client targeting `model` on the runtime at `base_url`.
    pub fn new(base_url: &str, model: &str) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("study-helper/local")
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "Summarize the following text in plain declarative sentences. \
         Use between {} and {} words. Return only the summary.\n\n{}",
        request.min_len, request.max_len, request.text
    )
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl SummarizationClient for LocalSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": {
                // Greedy decoding, matching `do_sample: false` on the hosted model.
                "temperature": 0.0,
                "num_predict": request.max_len * 2,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "model '{}' is not available at {}",
                self.model,
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let summary = body.response.trim();
        if summary.is_empty() {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama returned an empty summary".into(),
            ));
        }
        Ok(summary.to_string())
    }
}
