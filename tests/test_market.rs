//! Market insight requests.

mod common;

use agrigrow::application::structured::StructuredReply;
use agrigrow::domain::error::DomainError;
use common::{setup_with, CannedCompletion};

#[tokio::test]
async fn test_market_advice_parses_insight() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(r#"{
        "cropName": "onion",
        "trend": "rising due to seasonal shortage",
        "priceOutlook": "Prices expected to climb through the month",
        "sellRecommendation": "Hold for two weeks if storage allows",
        "advice": ["Check mandi prices daily", "Avoid distress selling"]
    }"#
    .to_string())]));

    let reply = ag.market_advice("onion").await.unwrap();
    match reply {
        StructuredReply::Parsed(insight) => {
            assert_eq!(insight.crop_name, "onion");
            assert!(insight.trend.unwrap().contains("rising"));
            assert_eq!(insight.advice.len(), 2);
        }
        StructuredReply::Unparsed(raw) => panic!("expected parsed insight, got {raw}"),
    }
}

#[tokio::test]
async fn test_market_advice_falls_back_to_raw_text() {
    let ag = setup_with(CannedCompletion::new(vec![Ok(
        "Onion prices usually rise before winter.".to_string(),
    )]));
    let reply = ag.market_advice("onion").await.unwrap();
    assert!(matches!(reply, StructuredReply::Unparsed(_)));
}

#[tokio::test]
async fn test_market_advice_empty_crop_rejected() {
    let ag = setup_with(CannedCompletion::empty());
    let err = ag.market_advice("  ").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}
