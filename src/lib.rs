pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::advise::{
    format_for_speech, CropAdvice, IntentDetection, SpeechResponse, VoiceAdvice,
    VoiceAdvisorUseCase,
};
use crate::application::diagnose::{CropDoctorUseCase, Diagnosis};
use crate::application::hybrid_query::{HybridQueryUseCase, SchemeMatch};
use crate::application::market::{MarketInsight, MarketUseCase};
use crate::application::retry::RetryPolicy;
use crate::application::schemes::{EligibilityAnalysis, SchemeUseCase};
use crate::application::semantic_query::SemanticQueryUseCase;
use crate::application::store_document::{DocumentInput, StoreDocumentUseCase};
use crate::application::structured::StructuredReply;
use crate::config::AgriConfig;
use crate::domain::entities::scheme::Scheme;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::scheme_repository::SchemeRepository;
use crate::domain::ports::vector_store::{QueryMatch, VectorStore};
use crate::domain::values::farmer_profile::FarmerProfile;
use crate::domain::values::scheme_category::SchemeCategory;
use crate::infrastructure::embeddings::gemini::GeminiEmbedder;
use crate::infrastructure::embeddings::noop::NoopEmbedder;
use crate::infrastructure::generative::gemini::GeminiCompletion;
use crate::infrastructure::generative::noop::NoopCompletion;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::scheme_repo::SqliteSchemeRepo;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use rusqlite::Connection;
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct AgriGrow {
    store_uc: Arc<StoreDocumentUseCase>,
    semantic_uc: SemanticQueryUseCase,
    doctor_uc: CropDoctorUseCase,
    voice_uc: VoiceAdvisorUseCase,
    scheme_uc: SchemeUseCase,
    market_uc: MarketUseCase,
    vector_store: Arc<dyn VectorStore>,
}

impl AgriGrow {
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        let config = AgriConfig::from_env();
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let provider = std::env::var("AGRIGROW_PROVIDER").unwrap_or_else(|_| {
            if api_key.is_empty() {
                "noop".into()
            } else {
                "gemini".into()
            }
        });

        let (embedder, completion): (Arc<dyn EmbeddingProvider>, Arc<dyn CompletionProvider>) =
            match provider.as_str() {
                "gemini" => (
                    Arc::new(GeminiEmbedder::new(
                        api_key.clone(),
                        Some(config.embedding_model.clone()),
                        config.request_timeout,
                    )),
                    Arc::new(GeminiCompletion::new(
                        api_key,
                        config.text_model.clone(),
                        config.vision_model.clone(),
                        config.request_timeout,
                        config.max_image_bytes,
                        config.accepted_image_mime.clone(),
                    )),
                ),
                _ => (Arc::new(NoopEmbedder), Arc::new(NoopCompletion)),
            };

        Self::with_config(db_path, config, embedder, completion)
    }

    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Result<Self, DomainError> {
        Self::with_config(db_path, AgriConfig::default(), embedder, completion)
    }

    pub fn with_config(
        db_path: &str,
        config: AgriConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Result<Self, DomainError> {
        let conn1 = open_connection(db_path)?;
        let conn2 = open_connection(db_path)?;
        run_migrations(&conn1)?;
        run_migrations(&conn2)?;

        let scheme_repo: Arc<dyn SchemeRepository> = Arc::new(SqliteSchemeRepo::new(conn1));
        let vector_store: Arc<dyn VectorStore> =
            Arc::new(SqliteVectorStore::new(conn2, config.upsert_chunk_size));

        // Connection handles are validated once here and then reused.
        vector_store.ping()?;

        let provider_dim = embedder.dimension();
        if provider_dim > 0 {
            if let Ok(Some(stored_dim)) = vector_store.stored_dimension() {
                if stored_dim != provider_dim {
                    tracing::warn!(
                        stored_dim,
                        provider_dim,
                        "stored vectors do not match the embedding provider dimension; re-store documents to re-embed"
                    );
                }
            }
        }

        let retry = RetryPolicy::new(config.max_retries);
        let store_uc = Arc::new(StoreDocumentUseCase::new(
            embedder.clone(),
            vector_store.clone(),
            retry.clone(),
            config.embed_batch_size,
        ));
        let semantic_uc = SemanticQueryUseCase::new(
            embedder,
            vector_store.clone(),
            retry.clone(),
            config.treatments_namespace.clone(),
            config.schemes_namespace.clone(),
            config.treatment_top_k,
            config.scheme_top_k,
        );
        let hybrid_uc = HybridQueryUseCase::new(scheme_repo.clone(), semantic_uc.clone());
        let doctor_uc = CropDoctorUseCase::new(
            completion.clone(),
            semantic_uc.clone(),
            retry.clone(),
            config.max_image_bytes,
            config.accepted_image_mime.clone(),
        );
        let voice_uc =
            VoiceAdvisorUseCase::new(completion.clone(), semantic_uc.clone(), retry.clone());
        let scheme_uc = SchemeUseCase::new(
            scheme_repo,
            hybrid_uc,
            store_uc.clone(),
            completion.clone(),
            retry.clone(),
            config.schemes_namespace.clone(),
        );
        let market_uc = MarketUseCase::new(completion, retry);

        Ok(Self {
            store_uc,
            semantic_uc,
            doctor_uc,
            voice_uc,
            scheme_uc,
            market_uc,
            vector_store,
        })
    }

    // RAG orchestration

    pub async fn store_document(
        &self,
        namespace: &str,
        doc: DocumentInput,
    ) -> Result<(), DomainError> {
        self.store_uc.store(namespace, doc).await
    }

    pub async fn store_documents_batch(
        &self,
        namespace: &str,
        docs: Vec<DocumentInput>,
    ) -> Result<usize, DomainError> {
        self.store_uc.store_batch(namespace, docs).await
    }

    pub async fn semantic_query(
        &self,
        query_text: &str,
        top_k: usize,
        namespace: &str,
        filter: Option<&Map<String, Value>>,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        self.semantic_uc.query(query_text, top_k, namespace, filter).await
    }

    pub async fn query_treatments(
        &self,
        disease_query: &str,
        crop_name: Option<&str>,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        self.semantic_uc.treatments(disease_query, crop_name).await
    }

    pub async fn query_schemes(
        &self,
        profile: &FarmerProfile,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        self.semantic_uc.schemes(profile).await
    }

    pub fn delete_documents(&self, namespace: &str, ids: &[String]) -> Result<usize, DomainError> {
        self.vector_store.delete_by_ids(namespace, ids)
    }

    pub fn clear_namespace(&self, namespace: &str) -> Result<(), DomainError> {
        self.vector_store.delete_namespace(namespace)
    }

    // Scheme matching

    pub async fn find_eligible_schemes(
        &self,
        profile: &FarmerProfile,
    ) -> Result<Vec<SchemeMatch>, DomainError> {
        self.scheme_uc.find_eligible(profile).await
    }

    pub async fn add_scheme(&self, scheme: Scheme) -> Result<Scheme, DomainError> {
        self.scheme_uc.add(scheme).await
    }

    pub fn schemes(&self, category: Option<SchemeCategory>) -> Result<Vec<Scheme>, DomainError> {
        self.scheme_uc.all(category)
    }

    pub fn scheme_by_id(&self, id: &str) -> Result<Scheme, DomainError> {
        self.scheme_uc.by_id(id)
    }

    pub fn search_schemes(&self, keyword: &str) -> Result<Vec<Scheme>, DomainError> {
        self.scheme_uc.search(keyword)
    }

    pub async fn analyze_eligibility(
        &self,
        scheme_id: &str,
        profile: &FarmerProfile,
    ) -> Result<StructuredReply<EligibilityAnalysis>, DomainError> {
        self.scheme_uc.analyze_eligibility(scheme_id, profile).await
    }

    // Crop doctor

    pub async fn diagnose_text(&self, description: &str) -> Result<Diagnosis, DomainError> {
        self.doctor_uc.diagnose_text(description).await
    }

    pub async fn diagnose_image(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<Diagnosis, DomainError> {
        self.doctor_uc.diagnose_image(image, mime_type).await
    }

    // Voice advisor

    pub async fn voice_query(
        &self,
        transcript: &str,
        language: &str,
    ) -> Result<VoiceAdvice, DomainError> {
        self.voice_uc.process_query(transcript, language).await
    }

    pub async fn detect_intent(&self, transcript: &str) -> Result<IntentDetection, DomainError> {
        self.voice_uc.detect_intent(transcript).await
    }

    pub async fn crop_advice(
        &self,
        crop_name: &str,
        issue: &str,
    ) -> Result<StructuredReply<CropAdvice>, DomainError> {
        self.voice_uc.crop_advice(crop_name, issue).await
    }

    pub fn speech_format(&self, text: &str) -> SpeechResponse {
        format_for_speech(text)
    }

    // Market insight

    pub async fn market_advice(
        &self,
        crop_name: &str,
    ) -> Result<StructuredReply<MarketInsight>, DomainError> {
        self.market_uc.price_advice(crop_name).await
    }
}

fn open_connection(db_path: &str) -> Result<Connection, DomainError> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    Ok(conn)
}
