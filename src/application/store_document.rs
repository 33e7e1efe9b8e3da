use crate::application::retry::RetryPolicy;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::vector_store::{VectorRecord, VectorStore, TEXT_EXCERPT_MAX};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Value,
}

pub struct StoreDocumentUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    retry: RetryPolicy,
    embed_batch_size: usize,
}

impl StoreDocumentUseCase {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        retry: RetryPolicy,
        embed_batch_size: usize,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            retry,
            embed_batch_size: embed_batch_size.max(1),
        }
    }

    pub async fn store(&self, namespace: &str, doc: DocumentInput) -> Result<(), DomainError> {
        validate(&doc)?;
        let texts = vec![doc.text.clone()];
        let vectors = self
            .retry
            .run(|| self.embedder.embed(&texts, InputType::Document))
            .await?;
        let embedding = vectors
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("provider returned no vector".into()))?;
        let record = build_record(doc, embedding)?;
        self.vector_store.upsert(namespace, record)?;
        tracing::debug!(namespace, "document stored");
        Ok(())
    }

    /// All-or-nothing batch store: every text is embedded before anything
    /// is upserted, so a single embedding failure leaves the index
    /// untouched. Embedding runs one bounded sub-batch at a time.
    pub async fn store_batch(
        &self,
        namespace: &str,
        docs: Vec<DocumentInput>,
    ) -> Result<usize, DomainError> {
        if docs.is_empty() {
            return Ok(0);
        }
        for doc in &docs {
            validate(doc)?;
        }

        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(docs.len());
        for chunk in docs.chunks(self.embed_batch_size) {
            let texts: Vec<String> = chunk.iter().map(|d| d.text.clone()).collect();
            let vectors = self
                .retry
                .run(|| self.embedder.embed(&texts, InputType::Document))
                .await?;
            if vectors.len() != chunk.len() {
                return Err(DomainError::Embedding(format!(
                    "provider returned {} vectors for {} texts",
                    vectors.len(),
                    chunk.len()
                )));
            }
            embeddings.extend(vectors);
        }

        let records = docs
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| build_record(doc, embedding))
            .collect::<Result<Vec<_>, _>>()?;

        let count = self.vector_store.upsert_batch(namespace, records)?;
        tracing::debug!(namespace, count, "batch stored");
        Ok(count)
    }
}

fn validate(doc: &DocumentInput) -> Result<(), DomainError> {
    if doc.id.trim().is_empty() {
        return Err(DomainError::InvalidInput("document id must not be empty".into()));
    }
    if doc.text.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!(
            "document {} has empty text",
            doc.id
        )));
    }
    Ok(())
}

fn build_record(doc: DocumentInput, embedding: Vec<f32>) -> Result<VectorRecord, DomainError> {
    let mut metadata = match doc.metadata {
        Value::Null => serde_json::Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(DomainError::InvalidInput(format!(
                "document {} metadata must be a JSON object, got {}",
                doc.id, other
            )))
        }
    };
    metadata.insert("createdAt".into(), Value::String(Utc::now().to_rfc3339()));

    let text_excerpt: String = doc.text.chars().take(TEXT_EXCERPT_MAX).collect();
    Ok(VectorRecord {
        id: doc.id,
        embedding,
        metadata: Value::Object(metadata),
        text_excerpt,
    })
}
