use crate::domain::values::severity::Severity;
use serde::{Deserialize, Serialize};

/// Structured disease diagnosis as produced by the generative model.
/// `name` and `crop_name` are required so that unrelated JSON shapes
/// (clarification messages, refusals) fail to parse and fall through to
/// the caller's fallback handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    pub name: String,
    pub crop_name: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub treatment: Treatment,
    #[serde(default)]
    pub organic_alternatives: OrganicAlternatives,
    #[serde(default)]
    pub prevention_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(default)]
    pub fungicide: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub safety_notes: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganicAlternatives {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub process: Vec<String>,
}
