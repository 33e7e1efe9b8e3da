use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};

/// Keyless fallback. Returns empty vectors — signals no embedding
/// available, so semantic lookups quietly produce no results.
pub struct NoopEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|_| vec![]).collect())
    }

    fn dimension(&self) -> usize {
        0
    }
}
