use crate::application::retry::RetryPolicy;
use crate::application::structured::{complete_structured, StructuredReply};
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// AI-generated market outlook for one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsight {
    pub crop_name: String,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub price_outlook: Option<String>,
    #[serde(default)]
    pub sell_recommendation: Option<String>,
    #[serde(default)]
    pub advice: Vec<String>,
}

pub struct MarketUseCase {
    completion: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl MarketUseCase {
    pub fn new(completion: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { completion, retry }
    }

    pub async fn price_advice(
        &self,
        crop_name: &str,
    ) -> Result<StructuredReply<MarketInsight>, DomainError> {
        if crop_name.trim().is_empty() {
            return Err(DomainError::InvalidInput("crop name must not be empty".into()));
        }
        let request = CompletionRequest::text(insight_prompt(crop_name));
        complete_structured::<MarketInsight>(&self.completion, &self.retry, request).await
    }
}

const INSIGHT_SHAPE: &str = r#"{
    "cropName": "the crop in question",
    "trend": "rising|falling|stable with a short explanation",
    "priceOutlook": "Expected price movement over the coming weeks",
    "sellRecommendation": "Whether to sell now or hold, and why",
    "advice": ["Practical step 1", "Practical step 2"]
}"#;

fn insight_prompt(crop_name: &str) -> String {
    format!(
        "You are an agricultural market advisor for Indian farmers. Provide a \
         market insight for {crop_name}: the general seasonal price trend, an \
         outlook, and practical selling advice in simple language.\n\n\
         Return ONLY a JSON object:\n{INSIGHT_SHAPE}"
    )
}
