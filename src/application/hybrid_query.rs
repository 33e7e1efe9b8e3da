use crate::application::semantic_query::SemanticQueryUseCase;
use crate::domain::entities::scheme::Scheme;
use crate::domain::error::DomainError;
use crate::domain::ports::scheme_repository::SchemeRepository;
use crate::domain::values::farmer_profile::FarmerProfile;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Database,
    Rag,
}

/// One merged scheme candidate. RAG-only hits carry whatever metadata the
/// vector mirror had and are flagged incomplete, since the document store
/// was never consulted for them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeMatch {
    pub id: String,
    pub match_score: f64,
    pub rule_score: Option<f64>,
    pub vector_score: Option<f64>,
    pub source: MatchSource,
    pub incomplete_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Hybrid scheme matching: structured candidate filtering merged with
/// vector similarity, either signal able to promote a record.
pub struct HybridQueryUseCase {
    scheme_repo: Arc<dyn SchemeRepository>,
    semantic: SemanticQueryUseCase,
}

impl HybridQueryUseCase {
    pub fn new(scheme_repo: Arc<dyn SchemeRepository>, semantic: SemanticQueryUseCase) -> Self {
        Self {
            scheme_repo,
            semantic,
        }
    }

    /// Runs both sub-lookups and merges by id, `max(rule, vector)` when a
    /// record appears in both. One failing side degrades to the other's
    /// results alone; only a simultaneous failure propagates.
    pub async fn execute(&self, profile: &FarmerProfile) -> Result<Vec<SchemeMatch>, DomainError> {
        let db_result = self.scheme_repo.find_candidates(profile);
        let rag_result = self.semantic.schemes(profile).await;

        let (db_schemes, rag_matches) = match (db_result, rag_result) {
            (Err(db_e), Err(rag_e)) => {
                return Err(DomainError::Database(format!(
                    "both scheme lookups failed; structured: {db_e}; vector: {rag_e}"
                )));
            }
            (Err(db_e), Ok(rag)) => {
                tracing::warn!(error = %db_e, "structured scheme lookup failed, using vector results only");
                (vec![], rag)
            }
            (Ok(db), Err(rag_e)) => {
                tracing::warn!(error = %rag_e, "vector scheme lookup failed, using structured results only");
                (db, vec![])
            }
            (Ok(db), Ok(rag)) => (db, rag),
        };

        // Insertion order is the tie-break for equal scores, DB-sourced
        // before RAG-sourced.
        let mut order: Vec<String> = Vec::new();
        let mut by_id: HashMap<String, SchemeMatch> = HashMap::new();

        for scheme in db_schemes {
            let rule_score = scheme.eligibility.match_score(profile);
            order.push(scheme.id.clone());
            by_id.insert(
                scheme.id.clone(),
                SchemeMatch {
                    id: scheme.id.clone(),
                    match_score: rule_score,
                    rule_score: Some(rule_score),
                    vector_score: None,
                    source: MatchSource::Database,
                    incomplete_metadata: false,
                    scheme: Some(scheme),
                    metadata: None,
                },
            );
        }

        for m in rag_matches {
            match by_id.get_mut(&m.id) {
                Some(existing) => {
                    existing.vector_score = Some(m.score);
                    existing.match_score = existing.match_score.max(m.score);
                }
                None => {
                    order.push(m.id.clone());
                    by_id.insert(
                        m.id.clone(),
                        SchemeMatch {
                            id: m.id,
                            match_score: m.score,
                            rule_score: None,
                            vector_score: Some(m.score),
                            source: MatchSource::Rag,
                            incomplete_metadata: true,
                            scheme: None,
                            metadata: Some(m.metadata),
                        },
                    );
                }
            }
        }

        let mut merged: Vec<SchemeMatch> = order
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();
        // Vec::sort_by is stable, so equal scores keep insertion order.
        merged.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(merged)
    }
}
