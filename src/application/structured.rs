use crate::application::retry::RetryPolicy;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a structured completion. Parse failure is not an error:
/// callers substitute their own minimal fallback shape from the raw text.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StructuredReply<T> {
    Parsed(T),
    Unparsed(String),
}

impl<T> StructuredReply<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            StructuredReply::Parsed(v) => Some(v),
            StructuredReply::Unparsed(_) => None,
        }
    }
}

/// Strips markdown code-fence markers the model sometimes wraps its JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// The one place prompt responses get fence-stripped and parsed. Retries
/// transient upstream failures per the policy; upstream errors propagate,
/// unparseable text comes back as `Unparsed`.
pub async fn complete_structured<T: DeserializeOwned>(
    completion: &Arc<dyn CompletionProvider>,
    retry: &RetryPolicy,
    request: CompletionRequest,
) -> Result<StructuredReply<T>, DomainError> {
    let raw = retry.run(|| completion.complete(&request)).await?;
    let cleaned = strip_code_fences(&raw);
    match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => Ok(StructuredReply::Parsed(value)),
        Err(e) => {
            tracing::debug!(error = %e, "completion was not the expected JSON shape");
            Ok(StructuredReply::Unparsed(cleaned))
        }
    }
}
