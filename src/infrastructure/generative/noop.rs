use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};

/// Keyless fallback. Completion-backed features report the generative
/// backend as unavailable instead of panicking.
pub struct NoopCompletion;

#[async_trait::async_trait]
impl CompletionProvider for NoopCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, DomainError> {
        Err(DomainError::Unavailable {
            service: "generative".into(),
            message: "no completion provider configured".into(),
        })
    }
}
