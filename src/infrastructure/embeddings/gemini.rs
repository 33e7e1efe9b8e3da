use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inputs longer than this are truncated before embedding; the upstream
/// model has a token limit and overlong text would be rejected. Applied
/// to every text, every call.
const MAX_EMBED_CHARS: usize = 8000;

pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    model: String,
    content: Content,
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<Embedding>,
}

#[derive(Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("AgriGrow/0.1")
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key,
            model: model.unwrap_or_else(|| "text-embedding-004".to_string()),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let task_type = match input_type {
            InputType::Document => "RETRIEVAL_DOCUMENT",
            InputType::Query => "RETRIEVAL_QUERY",
        };
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| EmbedRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part {
                            text: t.chars().take(MAX_EMBED_CHARS).collect(),
                        }],
                    },
                    task_type,
                })
                .collect(),
        };

        let url = format!("{}/models/{}:batchEmbedContents", self.base_url, self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Timeout("embedding request timed out".into())
                } else {
                    DomainError::Unavailable {
                        service: "embedding".into(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(DomainError::Unavailable {
                service: "embedding".into(),
                message: format!("upstream returned {status}"),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!(
                "embedding API {status}: {body}"
            )));
        }

        let result: BatchEmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::ResponseParse(format!("embedding response: {e}")))?;
        if result.embeddings.len() != texts.len() {
            return Err(DomainError::ResponseParse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.embeddings.len()
            )));
        }
        if result.embeddings.iter().any(|e| e.values.is_empty()) {
            return Err(DomainError::ResponseParse("empty embedding in response".into()));
        }
        Ok(result.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimension(&self) -> usize {
        768 // text-embedding-004 default
    }
}
