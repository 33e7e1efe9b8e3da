use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmerType {
    Marginal,
    Small,
    Medium,
    Large,
    Tenant,
}

impl fmt::Display for FarmerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FarmerType::Marginal => write!(f, "marginal"),
            FarmerType::Small => write!(f, "small"),
            FarmerType::Medium => write!(f, "medium"),
            FarmerType::Large => write!(f, "large"),
            FarmerType::Tenant => write!(f, "tenant"),
        }
    }
}

impl FromStr for FarmerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "marginal" => Ok(FarmerType::Marginal),
            "small" => Ok(FarmerType::Small),
            "medium" => Ok(FarmerType::Medium),
            "large" => Ok(FarmerType::Large),
            "tenant" => Ok(FarmerType::Tenant),
            _ => Err(format!("Unknown farmer type: {s}")),
        }
    }
}
