use crate::domain::error::DomainError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Stored text excerpts are truncated to this many characters.
pub const TEXT_EXCERPT_MAX: usize = 1000;

#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub metadata: Value,
    pub text_excerpt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f64,
    pub metadata: Value,
}

/// Namespaced vector index. Records in different namespaces never match
/// against each other. Namespaces come into existence on first write and
/// go away only via `delete_namespace`.
pub trait VectorStore: Send + Sync {
    /// Connection check, run once at process startup. Calls after a
    /// successful ping reuse the handle without re-validation.
    fn ping(&self) -> Result<(), DomainError>;

    /// Insert-or-replace keyed by (namespace, id). Last write wins.
    fn upsert(&self, namespace: &str, record: VectorRecord) -> Result<(), DomainError>;

    /// Upserts in fixed-size chunks. A failing chunk aborts the remainder;
    /// the error reports the chunk index and how many records made it in.
    fn upsert_batch(&self, namespace: &str, records: Vec<VectorRecord>)
        -> Result<usize, DomainError>;

    /// At most `top_k` matches, descending by score. `filter` restricts by
    /// exact-match metadata fields.
    fn query(
        &self,
        namespace: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&Map<String, Value>>,
    ) -> Result<Vec<QueryMatch>, DomainError>;

    fn delete_by_ids(&self, namespace: &str, ids: &[String]) -> Result<usize, DomainError>;

    /// Irreversibly clears every record in the namespace.
    fn delete_namespace(&self, namespace: &str) -> Result<(), DomainError>;

    /// Dimension of any stored vector, if one exists. Used to warn about
    /// provider/index dimension drift at startup.
    fn stored_dimension(&self) -> Result<Option<usize>, DomainError>;
}
