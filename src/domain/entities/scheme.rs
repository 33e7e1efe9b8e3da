use crate::domain::values::farmer_profile::FarmerProfile;
use crate::domain::values::scheme_category::SchemeCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region value that makes a scheme applicable everywhere.
pub const WILDCARD_REGION: &str = "All India";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    #[serde(default)]
    pub farmer_types: Vec<String>,
    #[serde(default)]
    pub min_land: Option<f64>,
    #[serde(default)]
    pub max_land: Option<f64>,
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub other_criteria: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    #[serde(default)]
    pub apply_link: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub processing_time: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: SchemeCategory,
    #[serde(default)]
    pub benefit: Option<String>,
    #[serde(default)]
    pub eligibility: Eligibility,
    #[serde(default)]
    pub application: ApplicationDetails,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Scheme {
    pub fn new(
        name: String,
        description: String,
        category: SchemeCategory,
        benefit: Option<String>,
        eligibility: Eligibility,
        application: ApplicationDetails,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description,
            category,
            benefit,
            eligibility,
            application,
            created_at: Utc::now(),
        }
    }

    /// Text representation mirrored into the vector index.
    pub fn embedding_text(&self) -> String {
        let e = &self.eligibility;
        format!(
            "{}: {}\nCategory: {}\nBenefit: {}\nEligible for: {}\nCrops: {}\nRegions: {}\nLand range: {}-{} acres",
            self.name,
            self.description,
            self.category,
            self.benefit.as_deref().unwrap_or(""),
            e.farmer_types.join(", "),
            e.crops.join(", "),
            e.regions.join(", "),
            e.min_land.unwrap_or(0.0),
            e.max_land.map(|m| m.to_string()).unwrap_or_else(|| "any".into()),
        )
    }

    /// Metadata carried by the vector mirror. Must be enough to present a
    /// RAG-only hit without a second document-store lookup.
    pub fn vector_metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "category": self.category.to_string(),
            "type": "scheme",
        })
    }
}

impl Eligibility {
    /// Candidate filter for the structured side of a hybrid lookup.
    /// An empty list on any criterion means "no restriction".
    pub fn admits(&self, profile: &FarmerProfile) -> bool {
        self.land_ok(profile) && self.region_ok(profile) && self.crops_ok(profile)
    }

    fn land_ok(&self, profile: &FarmerProfile) -> bool {
        if self.min_land.is_none() && self.max_land.is_none() {
            return true;
        }
        let min = self.min_land.unwrap_or(0.0);
        let max = self.max_land.unwrap_or(f64::MAX);
        profile.land_size >= min && profile.land_size <= max
    }

    fn region_ok(&self, profile: &FarmerProfile) -> bool {
        self.regions.is_empty()
            || self
                .regions
                .iter()
                .any(|r| r == &profile.region || r == WILDCARD_REGION)
    }

    fn crops_ok(&self, profile: &FarmerProfile) -> bool {
        self.crops.is_empty()
            || profile.crops.is_empty()
            || profile.crops.iter().any(|c| self.crops.contains(c))
    }

    /// Rule-based match score in [0, 1]: satisfied criteria over criteria
    /// present on the record. Criteria the record does not declare are
    /// skipped, not penalized. A record with no constrained criteria scores
    /// a neutral 0.5.
    pub fn match_score(&self, profile: &FarmerProfile) -> f64 {
        let mut satisfied = 0usize;
        let mut present = 0usize;

        if self.min_land.is_some() && self.max_land.is_some() {
            present += 1;
            if self.land_ok(profile) {
                satisfied += 1;
            }
        }

        if !self.regions.is_empty() {
            present += 1;
            if self
                .regions
                .iter()
                .any(|r| r == &profile.region || r == WILDCARD_REGION)
            {
                satisfied += 1;
            }
        }

        if !self.crops.is_empty() && !profile.crops.is_empty() {
            present += 1;
            if profile.crops.iter().any(|c| self.crops.contains(c)) {
                satisfied += 1;
            }
        }

        if !self.farmer_types.is_empty() {
            present += 1;
            if let Some(ft) = &profile.farmer_type {
                let wanted = ft.to_string();
                if self
                    .farmer_types
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&wanted))
                {
                    satisfied += 1;
                }
            }
        }

        if present == 0 {
            0.5
        } else {
            satisfied as f64 / present as f64
        }
    }
}
