use crate::application::retry::RetryPolicy;
use crate::application::semantic_query::SemanticQueryUseCase;
use crate::application::structured::{complete_structured, StructuredReply};
use crate::domain::entities::diagnosis::DiseaseReport;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a diagnosis request. A model reply that parses as neither a
/// report nor a clarification request comes back raw instead of failing
/// the request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Diagnosis {
    Report(DiseaseReport),
    NeedMoreDetail { message: String },
    Unstructured { raw: String },
}

#[derive(Debug, Deserialize)]
struct Clarification {
    message: String,
}

pub struct CropDoctorUseCase {
    completion: Arc<dyn CompletionProvider>,
    semantic: SemanticQueryUseCase,
    retry: RetryPolicy,
    max_image_bytes: usize,
    accepted_image_mime: String,
}

impl CropDoctorUseCase {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        semantic: SemanticQueryUseCase,
        retry: RetryPolicy,
        max_image_bytes: usize,
        accepted_image_mime: String,
    ) -> Self {
        Self {
            completion,
            semantic,
            retry,
            max_image_bytes,
            accepted_image_mime,
        }
    }

    pub async fn diagnose_image(
        &self,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<Diagnosis, DomainError> {
        if image.is_empty() {
            return Err(DomainError::InvalidInput("image is empty".into()));
        }
        if image.len() > self.max_image_bytes {
            return Err(DomainError::InvalidInput(format!(
                "image is {} bytes, limit is {}",
                image.len(),
                self.max_image_bytes
            )));
        }
        if mime_type != self.accepted_image_mime {
            return Err(DomainError::InvalidInput(format!(
                "unsupported image type {mime_type}, expected {}",
                self.accepted_image_mime
            )));
        }

        let request =
            CompletionRequest::vision(image_prompt(), image, self.accepted_image_mime.clone());
        let reply = complete_structured::<DiseaseReport>(&self.completion, &self.retry, request)
            .await?;
        Ok(into_diagnosis(reply))
    }

    pub async fn diagnose_text(&self, description: &str) -> Result<Diagnosis, DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::InvalidInput("description must not be empty".into()));
        }

        let context = self.semantic.treatment_context(description, 3).await;
        let request = CompletionRequest::text(text_prompt(description, &context));
        let reply = complete_structured::<DiseaseReport>(&self.completion, &self.retry, request)
            .await?;
        Ok(into_diagnosis(reply))
    }
}

fn into_diagnosis(reply: StructuredReply<DiseaseReport>) -> Diagnosis {
    match reply {
        StructuredReply::Parsed(report) => Diagnosis::Report(report),
        StructuredReply::Unparsed(raw) => {
            match serde_json::from_str::<Clarification>(&raw) {
                Ok(c) => Diagnosis::NeedMoreDetail { message: c.message },
                Err(_) => Diagnosis::Unstructured { raw },
            }
        }
    }
}

fn report_shape() -> &'static str {
    r#"{
    "name": "string",
    "cropName": "string",
    "severity": "Low | Medium | High",
    "symptoms": ["string"],
    "treatment": {
        "fungicide": "string",
        "dosage": "string",
        "steps": ["string"],
        "safetyNotes": ["string"],
        "source": "string"
    },
    "organicAlternatives": {
        "method": "string",
        "materials": ["string"],
        "process": ["string"]
    },
    "preventionMethods": ["string"]
}"#
}

fn image_prompt() -> String {
    format!(
        "Analyze this crop or plant image and extract the disease details.\n\
         Return ONLY a JSON object in this exact structure:\n{}\n\
         Do not include markdown formatting like ```json.",
        report_shape()
    )
}

fn text_prompt(description: &str, context: &str) -> String {
    let context_block = if context.is_empty() {
        String::new()
    } else {
        format!("Relevant treatment information from the knowledge base:\n{context}\n\n")
    };
    format!(
        "You process farmer descriptions of crops and crop diseases and respond \
         ONLY with a valid JSON object.\n\n\
         {context_block}\
         If the description contains clear details such as crop name, symptoms or \
         affected parts, return ONLY a JSON object in this exact structure:\n{}\n\n\
         If the description is crop-related but lacks sufficient detail, return ONLY:\n\
         {{ \"message\": \"Please provide a detailed description including the crop name, \
         observed symptoms, and affected parts.\" }}\n\n\
         No markdown, no comments, no extra text.\n\
         Description: {description}",
        report_shape()
    )
}
