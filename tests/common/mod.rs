//! Shared test helpers.
#![allow(dead_code)]

use agrigrow::domain::entities::scheme::{ApplicationDetails, Eligibility, Scheme};
use agrigrow::domain::error::DomainError;
use agrigrow::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use agrigrow::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use agrigrow::domain::values::farmer_profile::FarmerProfile;
use agrigrow::domain::values::scheme_category::SchemeCategory;
use agrigrow::AgriGrow;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

pub const DIM: usize = 64;

/// Deterministic bag-of-words embedder: each lowercased word hashes into
/// one of 64 buckets, vectors are L2-normalized. Texts that share words
/// score higher than texts that don't, which is all similarity ranking
/// tests need.
pub struct HashEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| hash_embed(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

pub fn hash_embed(text: &str) -> Vec<f32> {
    let mut v = vec![0.0_f32; DIM];
    for word in text.to_lowercase().split_whitespace() {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        v[(hasher.finish() % DIM as u64) as usize] += 1.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Completion provider fed from a queue of scripted replies.
pub struct CannedCompletion {
    replies: Mutex<VecDeque<Result<String, DomainError>>>,
}

impl CannedCompletion {
    pub fn new(replies: Vec<Result<String, DomainError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

#[async_trait::async_trait]
impl CompletionProvider for CannedCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, DomainError> {
        let mut replies = self.replies.lock().unwrap();
        replies
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::Generative("no scripted reply left".into())))
    }
}

pub fn setup() -> AgriGrow {
    setup_with(CannedCompletion::empty())
}

pub fn setup_with(completion: CannedCompletion) -> AgriGrow {
    AgriGrow::with_providers(":memory:", Arc::new(HashEmbedder), Arc::new(completion)).unwrap()
}

pub fn make_profile(land_size: f64, region: &str, crops: Vec<&str>) -> FarmerProfile {
    FarmerProfile {
        land_size,
        region: region.to_string(),
        crops: crops.into_iter().map(String::from).collect(),
        farmer_type: None,
        income: None,
    }
}

pub fn make_scheme(name: &str, category: SchemeCategory, eligibility: Eligibility) -> Scheme {
    Scheme::new(
        name.to_string(),
        format!("{name} support scheme for farmers"),
        category,
        Some("Rs 6000 per year".into()),
        eligibility,
        ApplicationDetails::default(),
    )
}
