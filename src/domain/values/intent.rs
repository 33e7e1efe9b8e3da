use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intent classes recognized in farmer voice transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DiseaseQuery,
    SchemeQuery,
    MarketQuery,
    WeatherQuery,
    GeneralQuery,
}

impl Default for Intent {
    fn default() -> Self {
        Intent::GeneralQuery
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::DiseaseQuery => write!(f, "disease_query"),
            Intent::SchemeQuery => write!(f, "scheme_query"),
            Intent::MarketQuery => write!(f, "market_query"),
            Intent::WeatherQuery => write!(f, "weather_query"),
            Intent::GeneralQuery => write!(f, "general_query"),
        }
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disease_query" => Ok(Intent::DiseaseQuery),
            "scheme_query" => Ok(Intent::SchemeQuery),
            "market_query" => Ok(Intent::MarketQuery),
            "weather_query" => Ok(Intent::WeatherQuery),
            "general_query" => Ok(Intent::GeneralQuery),
            _ => Err(format!("Unknown intent: {s}")),
        }
    }
}
