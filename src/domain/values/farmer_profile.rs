use crate::domain::values::farmer_type::FarmerType;
use serde::{Deserialize, Serialize};

/// Request-scoped farmer details used as the query key for scheme matching.
/// Never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    pub land_size: f64,
    pub region: String,
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub farmer_type: Option<FarmerType>,
    #[serde(default)]
    pub income: Option<f64>,
}

impl FarmerProfile {
    /// Natural-language rendering used as the embedding key for the vector
    /// side of scheme lookups.
    pub fn query_text(&self) -> String {
        let crops = if self.crops.is_empty() {
            "crops".to_string()
        } else {
            self.crops.join(", ")
        };
        format!(
            "Farmer with {} acres in {} growing {}",
            self.land_size, self.region, crops
        )
    }
}
