//! Voice advisor: conversational advice, intent detection fallbacks and
//! speech formatting.

mod common;

use agrigrow::application::advise::{format_for_speech, AdviceCategory};
use agrigrow::application::structured::StructuredReply;
use agrigrow::domain::error::DomainError;
use agrigrow::domain::values::intent::Intent;
use common::{setup_with, CannedCompletion};

#[tokio::test]
async fn test_voice_query_parses_structured_advice() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(r#"{
        "response": "Spray neem oil in the evening and remove affected leaves.",
        "category": "disease",
        "followUpQuestions": ["How long has the crop been affected?"],
        "actionItems": ["Spray neem oil", "Remove affected leaves"]
    }"#
    .to_string())]));

    let advice = ag
        .voice_query("white spots on my cotton leaves", "en")
        .await
        .unwrap();
    assert_eq!(advice.category, AdviceCategory::Disease);
    assert!(advice.response.contains("neem oil"));
    assert_eq!(advice.action_items.len(), 2);
}

#[tokio::test]
async fn test_voice_query_falls_back_to_plain_text() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(
        "Just spray some neem oil, that usually works.".to_string(),
    )]));

    let advice = ag.voice_query("white spots on cotton", "en").await.unwrap();
    assert_eq!(advice.category, AdviceCategory::General);
    assert!(advice.response.contains("neem oil"));
    assert!(advice.follow_up_questions.is_empty());
}

#[tokio::test]
async fn test_voice_query_empty_transcript_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag.voice_query("", "en").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_intent_detection_parses_reply() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(r#"{
        "intent": "disease_query",
        "entities": {"cropName": "cotton", "disease": "white spots"},
        "confidence": 0.9,
        "requiresMoreInfo": false
    }"#
    .to_string())]));

    let detection = ag.detect_intent("white spots on my cotton").await.unwrap();
    assert_eq!(detection.intent, Intent::DiseaseQuery);
    assert_eq!(detection.entities.crop_name.as_deref(), Some("cotton"));
    assert!((detection.confidence - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_intent_detection_defaults_on_unparseable_reply() {
    let ag = setup_with(CannedCompletion::new(vec![Ok("no idea".to_string())]));
    let detection = ag.detect_intent("hello there").await.unwrap();
    assert_eq!(detection.intent, Intent::GeneralQuery);
    assert!((detection.confidence - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_intent_detection_defaults_on_upstream_error() {
    let ag = setup_with(CannedCompletion::new(vec![Err(DomainError::Generative(
        "model error".into(),
    ))]));
    let detection = ag.detect_intent("hello there").await.unwrap();
    assert_eq!(detection.intent, Intent::GeneralQuery);
}

#[tokio::test]
async fn test_crop_advice_parses_structure() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(r#"{
        "cropName": "wheat",
        "identifiedIssue": "Yellow rust",
        "severity": "Medium",
        "immediateActions": ["Spray propiconazole"],
        "treatment": {
            "chemical": {"product": "Propiconazole", "dosage": "1ml/l", "frequency": "weekly"},
            "organic": {"method": "Sulphur dust", "preparation": "as-is", "application": "morning"}
        },
        "prevention": ["Use resistant varieties"],
        "whenToSeekExpert": "If spread continues after two sprays"
    }"#
    .to_string())]));

    let reply = ag.crop_advice("wheat", "yellow stripes on leaves").await.unwrap();
    match reply {
        StructuredReply::Parsed(advice) => {
            assert_eq!(advice.crop_name, "wheat");
            assert!(advice.treatment.chemical.is_some());
            assert!(advice.treatment.organic.is_some());
        }
        StructuredReply::Unparsed(raw) => panic!("expected parsed advice, got {raw}"),
    }
}

#[tokio::test]
async fn test_crop_advice_empty_inputs_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag.crop_advice("", "some issue").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    let err = ag.crop_advice("wheat", " ").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[test]
fn test_format_for_speech_strips_markup() {
    let speech = format_for_speech("**Spray** neem oil.\n\nUse *2ml* per litre.");
    assert_eq!(speech.speech_text, "Spray neem oil.. Use 2ml per litre.");
    assert!(speech.display_text.contains("**Spray**"));
}

#[test]
fn test_format_for_speech_estimates_duration() {
    // 150 words at 150 wpm is exactly 60 seconds.
    let text = vec!["word"; 150].join(" ");
    let speech = format_for_speech(&text);
    assert_eq!(speech.estimated_duration_secs, 60);

    // 5 words round up to 2 seconds.
    let speech = format_for_speech("one two three four five");
    assert_eq!(speech.estimated_duration_secs, 2);
}

#[test]
fn test_format_for_speech_collapses_whitespace() {
    let speech = format_for_speech("too   many\n   spaces");
    assert_eq!(speech.speech_text, "too many. spaces");
}
