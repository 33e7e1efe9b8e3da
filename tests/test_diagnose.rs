//! Crop doctor: structured reports, clarification fallbacks and image
//! validation. Completion replies are scripted.

mod common;

use agrigrow::application::diagnose::Diagnosis;
use agrigrow::domain::error::DomainError;
use common::{setup_with, CannedCompletion};

const REPORT_JSON: &str = r#"{
    "name": "Late Blight",
    "cropName": "Tomato",
    "severity": "High",
    "symptoms": ["Dark water-soaked lesions", "White mold under leaves"],
    "treatment": {
        "fungicide": "Mancozeb",
        "dosage": "2g per litre",
        "steps": ["Remove affected leaves", "Spray in the evening"],
        "safetyNotes": ["Wear gloves"],
        "source": "knowledge base"
    },
    "organicAlternatives": {
        "method": "Copper spray",
        "materials": ["Copper sulphate"],
        "process": ["Dilute and spray weekly"]
    },
    "preventionMethods": ["Crop rotation", "Resistant varieties"]
}"#;

#[tokio::test]
async fn test_text_diagnosis_parses_report() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(REPORT_JSON.to_string())]));
    let diagnosis = ag
        .diagnose_text("My tomato plants have dark spots spreading fast")
        .await
        .unwrap();
    match diagnosis {
        Diagnosis::Report(report) => {
            assert_eq!(report.name, "Late Blight");
            assert_eq!(report.crop_name, "Tomato");
            assert_eq!(report.treatment.fungicide.as_deref(), Some("Mancozeb"));
            assert_eq!(report.symptoms.len(), 2);
        }
        other => panic!("expected report, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fenced_json_is_stripped_before_parsing() {
    let fenced = format!("```json\n{REPORT_JSON}\n```");
    let ag = setup_with(CannedCompletion::new(vec![Ok(fenced)]));
    let diagnosis = ag.diagnose_text("dark spots on tomato").await.unwrap();
    assert!(matches!(diagnosis, Diagnosis::Report(_)));
}

#[tokio::test]
async fn test_clarification_message_becomes_need_more_detail() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(
        r#"{"message": "Please describe the crop and symptoms in more detail."}"#.to_string(),
    )]));
    let diagnosis = ag.diagnose_text("plant sick").await.unwrap();
    match diagnosis {
        Diagnosis::NeedMoreDetail { message } => {
            assert!(message.contains("more detail"));
        }
        other => panic!("expected clarification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_reply_comes_back_raw() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(
        "It could be blight, hard to say without a photo.".to_string(),
    )]));
    let diagnosis = ag.diagnose_text("spots on leaves of my tomato").await.unwrap();
    match diagnosis {
        Diagnosis::Unstructured { raw } => assert!(raw.contains("blight")),
        other => panic!("expected unstructured, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_description_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag.diagnose_text("  ").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_image_diagnosis_parses_report() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(REPORT_JSON.to_string())]));
    let diagnosis = ag
        .diagnose_image(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg")
        .await
        .unwrap();
    assert!(matches!(diagnosis, Diagnosis::Report(_)));
}

#[tokio::test]
async fn test_empty_image_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag.diagnose_image(vec![], "image/jpeg").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_oversized_image_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let too_big = vec![0u8; 5 * 1024 * 1024 + 1];
    let err = ag.diagnose_image(too_big, "image/jpeg").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_wrong_mime_type_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag
        .diagnose_image(vec![1, 2, 3], "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_upstream_generative_error_propagates() {
    let ag = setup_with(CannedCompletion::new(vec![Err(DomainError::Generative(
        "model refused".into(),
    ))]));
    let err = ag.diagnose_text("spots on tomato leaves").await.unwrap_err();
    assert!(matches!(err, DomainError::Generative(_)));
}
