use crate::application::hybrid_query::{HybridQueryUseCase, SchemeMatch};
use crate::application::retry::RetryPolicy;
use crate::application::store_document::{DocumentInput, StoreDocumentUseCase};
use crate::application::structured::{complete_structured, StructuredReply};
use crate::domain::entities::scheme::Scheme;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use crate::domain::ports::scheme_repository::SchemeRepository;
use crate::domain::values::farmer_profile::FarmerProfile;
use crate::domain::values::scheme_category::SchemeCategory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Detailed AI eligibility analysis for one scheme and one farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityAnalysis {
    pub is_eligible: bool,
    #[serde(default)]
    pub eligibility_score: f64,
    #[serde(default)]
    pub matched_criteria: Vec<String>,
    #[serde(default)]
    pub unmatched_criteria: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub documents_needed: Vec<String>,
    #[serde(default)]
    pub estimated_benefit: Option<String>,
}

pub struct SchemeUseCase {
    scheme_repo: Arc<dyn SchemeRepository>,
    hybrid: HybridQueryUseCase,
    store: Arc<StoreDocumentUseCase>,
    completion: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
    schemes_namespace: String,
}

impl SchemeUseCase {
    pub fn new(
        scheme_repo: Arc<dyn SchemeRepository>,
        hybrid: HybridQueryUseCase,
        store: Arc<StoreDocumentUseCase>,
        completion: Arc<dyn CompletionProvider>,
        retry: RetryPolicy,
        schemes_namespace: String,
    ) -> Self {
        Self {
            scheme_repo,
            hybrid,
            store,
            completion,
            retry,
            schemes_namespace,
        }
    }

    pub async fn find_eligible(
        &self,
        profile: &FarmerProfile,
    ) -> Result<Vec<SchemeMatch>, DomainError> {
        self.hybrid.execute(profile).await
    }

    /// Adds a scheme to the document store and mirrors it into the vector
    /// index. A failed mirror leaves the scheme in the store and logs a
    /// warning (the index can be rebuilt later).
    pub async fn add(&self, scheme: Scheme) -> Result<Scheme, DomainError> {
        self.scheme_repo.add(&scheme)?;

        let doc = DocumentInput {
            id: scheme.id.clone(),
            text: scheme.embedding_text(),
            metadata: scheme.vector_metadata(),
        };
        if let Err(e) = self.store.store(&self.schemes_namespace, doc).await {
            tracing::warn!(scheme = %scheme.id, error = %e, "vector mirror failed, scheme saved to store only");
        }
        Ok(scheme)
    }

    pub fn all(&self, category: Option<SchemeCategory>) -> Result<Vec<Scheme>, DomainError> {
        self.scheme_repo.all(category)
    }

    pub fn by_id(&self, id: &str) -> Result<Scheme, DomainError> {
        self.scheme_repo
            .get_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("scheme {id}")))
    }

    pub fn search(&self, keyword: &str) -> Result<Vec<Scheme>, DomainError> {
        if keyword.trim().is_empty() {
            return Err(DomainError::InvalidInput("search keyword must not be empty".into()));
        }
        self.scheme_repo.search(keyword)
    }

    pub async fn analyze_eligibility(
        &self,
        scheme_id: &str,
        profile: &FarmerProfile,
    ) -> Result<StructuredReply<EligibilityAnalysis>, DomainError> {
        let scheme = self.by_id(scheme_id)?;
        let request = CompletionRequest::text(analysis_prompt(&scheme, profile));
        complete_structured::<EligibilityAnalysis>(&self.completion, &self.retry, request).await
    }
}

const ANALYSIS_SHAPE: &str = r#"{
    "isEligible": true,
    "eligibilityScore": 0,
    "matchedCriteria": ["List of criteria the farmer meets"],
    "unmatchedCriteria": ["List of criteria not met"],
    "recommendation": "Detailed recommendation for the farmer",
    "nextSteps": ["Step 1 to apply", "Step 2"],
    "documentsNeeded": ["Document 1", "Document 2"],
    "estimatedBenefit": "Estimated benefit amount or description"
}"#;

fn analysis_prompt(scheme: &Scheme, profile: &FarmerProfile) -> String {
    let e = &scheme.eligibility;
    let list = |items: &[String], empty: &str| {
        if items.is_empty() {
            empty.to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Analyze if this farmer is eligible for the government scheme.\n\n\
         Scheme details:\n\
         - Name: {}\n\
         - Category: {}\n\
         - Description: {}\n\
         - Farmer types: {}\n\
         - Land range: {} - {} acres\n\
         - Eligible crops: {}\n\
         - Regions: {}\n\
         - Other criteria: {}\n\n\
         Farmer profile:\n\
         - Land size: {} acres\n\
         - Region: {}\n\
         - Crops: {}\n\
         - Farmer type: {}\n\
         - Annual income: {}\n\n\
         Provide eligibility analysis as JSON (eligibilityScore is 0-100):\n{ANALYSIS_SHAPE}",
        scheme.name,
        scheme.category,
        scheme.description,
        list(&e.farmer_types, "Any"),
        e.min_land.unwrap_or(0.0),
        e.max_land.map(|m| m.to_string()).unwrap_or_else(|| "No limit".into()),
        list(&e.crops, "Any"),
        list(&e.regions, "All India"),
        list(&e.other_criteria, "None"),
        profile.land_size,
        profile.region,
        list(&profile.crops, "Not specified"),
        profile
            .farmer_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Not specified".into()),
        profile
            .income
            .map(|i| i.to_string())
            .unwrap_or_else(|| "Not specified".into()),
    )
}
