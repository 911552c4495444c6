use anyhow::anyhow;
use anyhow::Result;

use super::is_payment_required;
use super::ApiError;
use super::GenerateRequest;

#[test]
fn it_omits_missing_credentials_from_generate_requests() -> Result<()> {
    let req = GenerateRequest {
        year: 2035,
        lang: "en".to_string(),
        device_id: Some("device-1".to_string()),
        token: None,
    };

    insta::assert_snapshot!(serde_json::to_string(&req)?, @r###"{"year":2035,"lang":"en","device_id":"device-1"}"###);
    return Ok(());
}

#[test]
fn it_recovers_status_from_wrapped_errors() {
    let err: anyhow::Error = ApiError::new(402, "/api/generate").into();
    assert_eq!(ApiError::status_of(&err), Some(402));
    assert!(is_payment_required(&err));
    assert_eq!(err.to_string(), "HTTP 402 from /api/generate");
}

#[test]
fn it_ignores_other_errors() {
    let err = anyhow!("connection refused");
    assert_eq!(ApiError::status_of(&err), None);
    assert!(!is_payment_required(&err));
    assert!(!ApiError::new(500, "/api/generate").is_payment_required());
}
