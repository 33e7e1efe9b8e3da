use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest, ModelClass};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct GeminiCompletion {
    client: Client,
    api_key: String,
    text_model: String,
    vision_model: String,
    base_url: String,
    max_image_bytes: usize,
    accepted_image_mime: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart {
    Text(String),
    InlineData(InlineData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiCompletion {
    pub fn new(
        api_key: String,
        text_model: String,
        vision_model: String,
        timeout: Duration,
        max_image_bytes: usize,
        accepted_image_mime: String,
    ) -> Self {
        Self {
            client: Client::builder()
                .user_agent("AgriGrow/0.1")
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key,
            text_model,
            vision_model,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            max_image_bytes,
            accepted_image_mime,
        }
    }

    /// Image payloads are checked here, before anything is encoded or
    /// sent, so every caller of the port gets the same limits.
    fn validate_image(&self, request: &CompletionRequest) -> Result<(), DomainError> {
        let Some(image) = &request.image else {
            return Ok(());
        };
        if image.bytes.is_empty() {
            return Err(DomainError::InvalidInput("image is empty".into()));
        }
        if image.bytes.len() > self.max_image_bytes {
            return Err(DomainError::InvalidInput(format!(
                "image is {} bytes, limit is {}",
                image.bytes.len(),
                self.max_image_bytes
            )));
        }
        if image.mime_type != self.accepted_image_mime {
            return Err(DomainError::InvalidInput(format!(
                "unsupported image type {}, expected {}",
                image.mime_type, self.accepted_image_mime
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        self.validate_image(request)?;
        let model = match request.model_class {
            ModelClass::Text => &self.text_model,
            ModelClass::Vision => &self.vision_model,
        };

        let mut parts = vec![RequestPart::Text(request.prompt.clone())];
        if let Some(image) = &request.image {
            parts.push(RequestPart::InlineData(InlineData {
                mime_type: image.mime_type.clone(),
                data: BASE64.encode(&image.bytes),
            }));
        }
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts,
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Timeout("completion request timed out".into())
                } else {
                    DomainError::Unavailable {
                        service: "generative".into(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(DomainError::Unavailable {
                service: "generative".into(),
                message: format!("upstream returned {status}"),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Generative(format!(
                "generative API {status}: {body}"
            )));
        }

        let result: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::ResponseParse(format!("completion response: {e}")))?;

        let text: String = result
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DomainError::Generative(
                "model returned no candidates".into(),
            ));
        }
        Ok(text)
    }
}
