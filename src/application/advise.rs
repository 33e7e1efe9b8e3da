use crate::application::retry::RetryPolicy;
use crate::application::semantic_query::SemanticQueryUseCase;
use crate::application::structured::{complete_structured, StructuredReply};
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use crate::domain::values::intent::Intent;
use crate::domain::values::severity::Severity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Disease,
    Scheme,
    Market,
    Weather,
    #[default]
    General,
}

/// Conversational advice for a voice transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAdvice {
    pub response: String,
    #[serde(default)]
    pub category: AdviceCategory,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEntities {
    #[serde(default)]
    pub crop_name: Option<String>,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDetection {
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub entities: IntentEntities,
    #[serde(default = "neutral_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub requires_more_info: bool,
    #[serde(default)]
    pub clarification_question: Option<String>,
}

fn neutral_confidence() -> f64 {
    0.5
}

impl Default for IntentDetection {
    fn default() -> Self {
        Self {
            intent: Intent::GeneralQuery,
            entities: IntentEntities::default(),
            confidence: 0.5,
            requires_more_info: false,
            clarification_question: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAdvice {
    pub crop_name: String,
    #[serde(default)]
    pub identified_issue: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub immediate_actions: Vec<String>,
    #[serde(default)]
    pub treatment: AdviceTreatment,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub when_to_seek_expert: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceTreatment {
    #[serde(default)]
    pub chemical: Option<ChemicalTreatment>,
    #[serde(default)]
    pub organic: Option<OrganicTreatment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalTreatment {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganicTreatment {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub preparation: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub speech_text: String,
    pub display_text: String,
    pub estimated_duration_secs: u32,
}

pub struct VoiceAdvisorUseCase {
    completion: Arc<dyn CompletionProvider>,
    semantic: SemanticQueryUseCase,
    retry: RetryPolicy,
}

impl VoiceAdvisorUseCase {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        semantic: SemanticQueryUseCase,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            completion,
            semantic,
            retry,
        }
    }

    /// Answers a transcript with RAG-assisted conversational advice. A
    /// reply that is not the expected JSON becomes a plain-text response
    /// in the general category instead of an error.
    pub async fn process_query(
        &self,
        transcript: &str,
        language: &str,
    ) -> Result<VoiceAdvice, DomainError> {
        if transcript.trim().is_empty() {
            return Err(DomainError::InvalidInput("transcript must not be empty".into()));
        }

        let context = self.semantic.treatment_context(transcript, 3).await;
        let request = CompletionRequest::text(advice_prompt(transcript, language, &context));
        let reply =
            complete_structured::<VoiceAdvice>(&self.completion, &self.retry, request).await?;
        Ok(match reply {
            StructuredReply::Parsed(advice) => advice,
            StructuredReply::Unparsed(raw) => VoiceAdvice {
                response: raw,
                category: AdviceCategory::General,
                follow_up_questions: vec![],
                action_items: vec![],
            },
        })
    }

    /// Intent extraction. Any upstream or parse failure degrades to the
    /// neutral general-query intent rather than failing the request.
    pub async fn detect_intent(&self, transcript: &str) -> Result<IntentDetection, DomainError> {
        if transcript.trim().is_empty() {
            return Err(DomainError::InvalidInput("transcript must not be empty".into()));
        }

        let request = CompletionRequest::text(intent_prompt(transcript));
        match complete_structured::<IntentDetection>(&self.completion, &self.retry, request).await {
            Ok(StructuredReply::Parsed(detection)) => Ok(detection),
            Ok(StructuredReply::Unparsed(_)) => Ok(IntentDetection::default()),
            Err(e) => {
                tracing::warn!(error = %e, "intent detection failed, defaulting to general query");
                Ok(IntentDetection::default())
            }
        }
    }

    pub async fn crop_advice(
        &self,
        crop_name: &str,
        issue: &str,
    ) -> Result<StructuredReply<CropAdvice>, DomainError> {
        if crop_name.trim().is_empty() || issue.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "crop name and issue must not be empty".into(),
            ));
        }

        let context = self
            .semantic
            .treatment_context(&format!("{crop_name} {issue}"), 3)
            .await;
        let request =
            CompletionRequest::text(crop_advice_prompt(crop_name, issue, &context));
        complete_structured::<CropAdvice>(&self.completion, &self.retry, request).await
    }
}

/// Strips markup and collapses whitespace into a TTS-friendly rendering.
/// Duration estimate assumes 150 words per minute.
pub fn format_for_speech(text: &str) -> SpeechResponse {
    let speech_text = text
        .replace("**", "")
        .replace('*', "")
        .replace("\n\n", ". ")
        .replace('\n', ". ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let words = speech_text.split_whitespace().count() as f64;
    SpeechResponse {
        estimated_duration_secs: (words / 150.0 * 60.0).ceil() as u32,
        speech_text,
        display_text: text.to_string(),
    }
}

const ADVICE_SHAPE: &str = r#"{
    "response": "Your helpful response text here",
    "category": "disease|scheme|market|weather|general",
    "followUpQuestions": ["Optional follow-up question"],
    "actionItems": ["Practical step"]
}"#;

const INTENT_SHAPE: &str = r#"{
    "intent": "disease_query|scheme_query|market_query|weather_query|general_query",
    "entities": {
        "cropName": "extracted crop name or null",
        "disease": "extracted disease or symptom or null",
        "region": "extracted region or null",
        "timeframe": "extracted time reference or null"
    },
    "confidence": 0.0,
    "requiresMoreInfo": false,
    "clarificationQuestion": "Question to ask if more info needed"
}"#;

const CROP_ADVICE_SHAPE: &str = r#"{
    "cropName": "the crop in question",
    "identifiedIssue": "What you think the problem is",
    "severity": "Low|Medium|High",
    "immediateActions": ["Step 1", "Step 2"],
    "treatment": {
        "chemical": {"product": "...", "dosage": "...", "frequency": "..."},
        "organic": {"method": "...", "preparation": "...", "application": "..."}
    },
    "prevention": ["Future prevention tips"],
    "whenToSeekExpert": "When to consult an agronomist"
}"#;

fn advice_prompt(transcript: &str, language: &str, context: &str) -> String {
    let context_block = if context.is_empty() {
        String::new()
    } else {
        format!("Relevant information from the knowledge base:\n{context}\n\n")
    };
    let language_note = if language == "en" {
        String::new()
    } else {
        format!(" Respond in {language} language.")
    };
    format!(
        "You are a helpful agricultural assistant for farmers. You help with \
         crop disease identification and treatment, farming best practices, \
         government schemes and subsidies, market prices, and weather-related tips.\n\n\
         {context_block}\
         Farmer's question: \"{transcript}\"\n\n\
         Provide practical, actionable advice in simple language. For diseases \
         suggest both chemical and organic solutions; for schemes mention \
         eligibility criteria. If the question is not about agriculture, politely \
         redirect to farming topics.{language_note}\n\n\
         Provide your response as a JSON object:\n{ADVICE_SHAPE}"
    )
}

fn intent_prompt(transcript: &str) -> String {
    format!(
        "Analyze this farmer's query and extract intent:\n\"{transcript}\"\n\n\
         Return JSON:\n{INTENT_SHAPE}"
    )
}

fn crop_advice_prompt(crop_name: &str, issue: &str, context: &str) -> String {
    let context_block = if context.is_empty() {
        String::new()
    } else {
        format!("Relevant treatment information:\n{context}\n\n")
    };
    format!(
        "You are an expert agricultural advisor. A farmer is asking about their \
         {crop_name} crop.\n\n\
         {context_block}\
         Issue described: \"{issue}\"\n\n\
         Provide detailed advice in JSON format:\n{CROP_ADVICE_SHAPE}"
    )
}
