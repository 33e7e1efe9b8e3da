use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeCategory {
    Income,
    Insurance,
    Subsidy,
    Loan,
    Training,
}

impl fmt::Display for SchemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeCategory::Income => write!(f, "income"),
            SchemeCategory::Insurance => write!(f, "insurance"),
            SchemeCategory::Subsidy => write!(f, "subsidy"),
            SchemeCategory::Loan => write!(f, "loan"),
            SchemeCategory::Training => write!(f, "training"),
        }
    }
}

impl FromStr for SchemeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(SchemeCategory::Income),
            "insurance" => Ok(SchemeCategory::Insurance),
            "subsidy" => Ok(SchemeCategory::Subsidy),
            "loan" => Ok(SchemeCategory::Loan),
            "training" => Ok(SchemeCategory::Training),
            _ => Err(format!("Unknown scheme category: {s}")),
        }
    }
}
