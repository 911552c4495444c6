use anyhow::Result;
use mockito::Matcher;
use test_utils::details_fixture;
use test_utils::stories_fixture;
use test_utils::token_fixture;

use super::HttpApi;
use crate::domain::models::Api;
use crate::domain::models::ApiError;
use crate::domain::models::CheckoutRequest;
use crate::domain::models::GenerateRequest;

fn generate_request() -> GenerateRequest {
    return GenerateRequest {
        year: 2035,
        lang: "en".to_string(),
        device_id: Some("device-1".to_string()),
        token: None,
    };
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.health_check().await;

    assert!(res.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(503)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let err = api.health_check().await.unwrap_err();

    assert_eq!(ApiError::status_of(&err), Some(503));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_generates_stories() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "year": 2035,
            "lang": "en",
            "device_id": "device-1"
        })))
        .with_status(200)
        .with_body(stories_fixture())
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.generate_stories(generate_request()).await?;

    assert_eq!(res.year, 2035);
    assert_eq!(res.stories.len(), 3);
    assert_eq!(res.stories[0].title, "Show HN: I taught my fridge to write Rust");
    assert_eq!(res.stories[2].domain, "");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_sends_tokens_instead_of_device_ids() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Json(serde_json::json!({
            "year": 2040,
            "lang": "ja",
            "token": "tok-1"
        })))
        .with_status(200)
        .with_body(r#"{"year":2040,"stories":[]}"#)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api
        .generate_stories(GenerateRequest {
            year: 2040,
            lang: "ja".to_string(),
            device_id: None,
            token: Some("tok-1".to_string()),
        })
        .await?;

    assert!(res.stories.is_empty());
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_surfaces_payment_required() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(402)
        .with_body(r#"{"detail":"Payment required"}"#)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let err = api.generate_stories(generate_request()).await.unwrap_err();

    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert!(api_err.is_payment_required());
    assert_eq!(api_err.endpoint, "/api/generate");
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_on_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(500)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let err = api.generate_stories(generate_request()).await.unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"HTTP 500 from /api/generate");
    mock.assert_async().await;
}

#[tokio::test]
async fn it_gets_story_details() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/story/1/details")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("year".to_string(), "2035".to_string()),
            Matcher::UrlEncoded("lang".to_string(), "en".to_string()),
        ]))
        .with_status(200)
        .with_body(details_fixture())
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.get_story_details(1, 2035, "en").await?;

    assert_eq!(res.story_id, 1);
    assert_eq!(res.comments.len(), 2);
    assert_eq!(res.comments[0].author, "borrowck");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_story_details_on_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/story/9/details")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let err = api.get_story_details(9, 2035, "en").await.unwrap_err();

    assert_eq!(ApiError::status_of(&err), Some(404));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_gets_trial_status() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/trial-status/device-1")
        .with_status(200)
        .with_body(r#"{"has_free_trial":true,"uses_remaining":1}"#)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.get_trial_status("device-1").await?;

    assert!(res.has_free_trial);
    assert_eq!(res.uses_remaining, 1);
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_lists_products() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/payment/products")
        .with_status(200)
        .with_body(
            r#"[
                {"sku":"future_hn_pack_3","generations":3,"price_cents":799},
                {"sku":"future_hn_pack_10","generations":10,"price_cents":1999,"discount_percent":25}
            ]"#,
        )
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.list_products().await?;

    assert_eq!(res.len(), 2);
    assert_eq!(res[0].discount_percent, None);
    assert_eq!(res[1].discount_percent, Some(25));
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_creates_checkout_sessions() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/payment/create-checkout")
        .match_body(Matcher::Json(serde_json::json!({
            "product_sku": "future_hn_pack_10",
            "device_id": "device-1",
            "success_url": "https://future-hn.example.com/payment/success",
            "cancel_url": "https://future-hn.example.com/pricing"
        })))
        .with_status(200)
        .with_body(r#"{"checkout_url":"https://pay.example.com/c/cs_1","session_id":"cs_1"}"#)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api
        .create_checkout(CheckoutRequest {
            product_sku: "future_hn_pack_10".to_string(),
            device_id: "device-1".to_string(),
            success_url: "https://future-hn.example.com/payment/success".to_string(),
            cancel_url: "https://future-hn.example.com/pricing".to_string(),
        })
        .await?;

    assert_eq!(res.checkout_url, "https://pay.example.com/c/cs_1");
    assert_eq!(res.session_id, "cs_1");
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_gets_token_info() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tokens/info/fhn_tok_1234567890abcdefghijklmnop")
        .with_status(200)
        .with_body(token_fixture())
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api
        .get_token_info("fhn_tok_1234567890abcdefghijklmnop")
        .await?;

    assert_eq!(res.remaining_generations, 3);
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_gets_tokens_by_device() -> Result<()> {
    let body = format!(r#"{{"tokens":[{}]}}"#, token_fixture());
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tokens/by-device/device-1")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let api = HttpApi::new(&server.url());
    let res = api.get_tokens_by_device("device-1").await?;

    assert_eq!(res.len(), 1);
    assert_eq!(res[0].product_sku, Some("future_hn_pack_3".to_string()));
    mock.assert_async().await;

    return Ok(());
}

#[test]
fn it_trims_trailing_slashes() {
    let api = HttpApi::new("http://localhost:8000/");
    assert_eq!(api.endpoint("/api/generate"), "http://localhost:8000/api/generate");
}
