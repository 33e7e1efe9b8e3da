use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelClass {
    Text,
    Vision,
}

#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model_class: ModelClass,
    pub image: Option<ImageAttachment>,
}

impl CompletionRequest {
    pub fn text(prompt: String) -> Self {
        Self {
            prompt,
            model_class: ModelClass::Text,
            image: None,
        }
    }

    pub fn vision(prompt: String, bytes: Vec<u8>, mime_type: String) -> Self {
        Self {
            prompt,
            model_class: ModelClass::Vision,
            image: Some(ImageAttachment { bytes, mime_type }),
        }
    }
}

/// Generative model boundary. Returns raw text; callers are responsible
/// for stripping code fences and parsing, and must treat parse failure as
/// recoverable rather than fatal.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
