//! Structured completion plumbing: fence stripping, parse fallback and
//! retry of transient upstream failures.

mod common;

use agrigrow::application::retry::RetryPolicy;
use agrigrow::application::structured::{complete_structured, strip_code_fences, StructuredReply};
use agrigrow::domain::error::DomainError;
use agrigrow::domain::ports::completion_port::{CompletionProvider, CompletionRequest};
use common::CannedCompletion;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct Sample {
    value: i64,
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::with_base_delay(2, Duration::from_millis(1))
}

#[test]
fn test_strip_code_fences() {
    assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    assert_eq!(strip_code_fences("plain text"), "plain text");
}

#[tokio::test]
async fn test_parses_fenced_json() {
    let completion: Arc<dyn CompletionProvider> = Arc::new(CannedCompletion::new(vec![Ok(
        "```json\n{\"value\": 42}\n```".to_string(),
    )]));
    let reply = complete_structured::<Sample>(
        &completion,
        &fast_retry(),
        CompletionRequest::text("prompt".into()),
    )
    .await
    .unwrap();

    match reply {
        StructuredReply::Parsed(sample) => assert_eq!(sample.value, 42),
        StructuredReply::Unparsed(raw) => panic!("expected parsed, got {raw}"),
    }
}

#[tokio::test]
async fn test_unparseable_reply_is_not_an_error() {
    let completion: Arc<dyn CompletionProvider> = Arc::new(CannedCompletion::new(vec![Ok(
        "```json\nnot actually json\n```".to_string(),
    )]));
    let reply = complete_structured::<Sample>(
        &completion,
        &fast_retry(),
        CompletionRequest::text("prompt".into()),
    )
    .await
    .unwrap();

    match reply {
        StructuredReply::Unparsed(raw) => assert_eq!(raw, "not actually json"),
        StructuredReply::Parsed(_) => panic!("expected unparsed"),
    }
}

#[tokio::test]
async fn test_transient_failure_is_retried_then_parsed() {
    let completion: Arc<dyn CompletionProvider> = Arc::new(CannedCompletion::new(vec![
        Err(DomainError::Unavailable {
            service: "generative".into(),
            message: "503".into(),
        }),
        Ok("{\"value\": 7}".to_string()),
    ]));
    let reply = complete_structured::<Sample>(
        &completion,
        &fast_retry(),
        CompletionRequest::text("prompt".into()),
    )
    .await
    .unwrap();

    assert!(matches!(reply, StructuredReply::Parsed(Sample { value: 7 })));
}

#[tokio::test]
async fn test_permanent_failure_propagates() {
    let completion: Arc<dyn CompletionProvider> = Arc::new(CannedCompletion::new(vec![Err(
        DomainError::Generative("blocked prompt".into()),
    )]));
    let result = complete_structured::<Sample>(
        &completion,
        &fast_retry(),
        CompletionRequest::text("prompt".into()),
    )
    .await;

    assert!(matches!(result, Err(DomainError::Generative(_))));
}
