use crate::application::retry::RetryPolicy;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::vector_store::{QueryMatch, VectorStore};
use crate::domain::values::farmer_profile::FarmerProfile;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Pure-read semantic lookup: embed the query text, delegate to the vector
/// store, return matches unchanged. Safe to call concurrently.
#[derive(Clone)]
pub struct SemanticQueryUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    retry: RetryPolicy,
    treatments_namespace: String,
    schemes_namespace: String,
    treatment_top_k: usize,
    scheme_top_k: usize,
}

impl SemanticQueryUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        retry: RetryPolicy,
        treatments_namespace: String,
        schemes_namespace: String,
        treatment_top_k: usize,
        scheme_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            retry,
            treatments_namespace,
            schemes_namespace,
            treatment_top_k,
            scheme_top_k,
        }
    }

    pub async fn query(
        &self,
        query_text: &str,
        top_k: usize,
        namespace: &str,
        filter: Option<&Map<String, Value>>,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        if query_text.trim().is_empty() {
            return Err(DomainError::InvalidInput("query text must not be empty".into()));
        }
        let texts = vec![query_text.to_string()];
        let vectors = self
            .retry
            .run(|| self.embedder.embed(&texts, InputType::Query))
            .await?;
        match vectors.first() {
            Some(v) if !v.is_empty() => self.vector_store.query(namespace, v, top_k, filter),
            // No embedding available (noop provider) — no semantic results.
            _ => Ok(vec![]),
        }
    }

    /// Treatment lookup for a disease or symptom description, optionally
    /// restricted to one crop.
    pub async fn treatments(
        &self,
        disease_query: &str,
        crop_name: Option<&str>,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        let filter = crop_name.map(|crop| {
            let mut map = Map::new();
            map.insert("cropName".into(), Value::String(crop.to_string()));
            map
        });
        self.query(
            disease_query,
            self.treatment_top_k,
            &self.treatments_namespace,
            filter.as_ref(),
        )
        .await
    }

    /// Vector side of scheme matching, keyed by the profile's
    /// natural-language description.
    pub async fn schemes(&self, profile: &FarmerProfile) -> Result<Vec<QueryMatch>, DomainError> {
        self.query(
            &profile.query_text(),
            self.scheme_top_k,
            &self.schemes_namespace,
            None,
        )
        .await
    }

    /// Top-k treatment excerpts assembled into prompt context. Failures
    /// and empty indexes both degrade to "no context".
    pub async fn treatment_context(&self, query_text: &str, top_k: usize) -> String {
        let matches = match self
            .query(query_text, top_k, &self.treatments_namespace, None)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "context lookup failed, proceeding without it");
                return String::new();
            }
        };
        matches
            .iter()
            .filter_map(|m| m.metadata.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
