use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use test_utils::details_fixture;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::ApiError;
use crate::domain::models::CreditSource;
use crate::domain::models::DetailsRequest;
use crate::domain::models::Event;
use crate::domain::models::GenerateRequest;
use crate::infrastructure::api::http::HttpApi;
use crate::infrastructure::identity::fixed::FixedIdentity;

fn service(url: &str) -> ActionsService {
    return ActionsService::new(
        Arc::new(HttpApi::new(url)),
        Arc::new(FixedIdentity::new("device-1")),
        "https://future-hn.example.com",
    );
}

#[tokio::test]
async fn it_reports_results_as_events() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/story/1/details")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(details_fixture())
        .create_async()
        .await;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let worker = service(&server.url());

    let req = DetailsRequest {
        story_id: 1,
        epoch: 4,
    };
    action_tx.send(Action::FetchDetails(req, 2035, "en".to_string()))?;
    drop(action_tx);
    worker.start(event_tx, &mut action_rx).await?;

    match event_rx.recv().await {
        Some(Event::DetailsLoaded(loaded, res)) => {
            assert_eq!(loaded, req);
            assert_eq!(res?.comments.len(), 2);
        }
        _ => bail!("Wrong event"),
    }

    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_passes_the_credit_source_through() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(402)
        .create_async()
        .await;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let worker = service(&server.url());

    action_tx.send(Action::GenerateStories(
        GenerateRequest {
            year: 2035,
            lang: "en".to_string(),
            device_id: None,
            token: Some("tok-1".to_string()),
        },
        CreditSource::Token("tok-1".to_string()),
    ))?;
    drop(action_tx);
    worker.start(event_tx, &mut action_rx).await?;

    match event_rx.recv().await {
        Some(Event::StoriesGenerated(used, res)) => {
            assert_eq!(used, CreditSource::Token("tok-1".to_string()));
            let err = res.unwrap_err();
            assert_eq!(ApiError::status_of(&err), Some(402));
        }
        _ => bail!("Wrong event"),
    }

    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_creates_checkouts_for_the_device() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/payment/create-checkout")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "product_sku": "future_hn_pack_3",
            "device_id": "device-1"
        })))
        .with_status(200)
        .with_body(r#"{"checkout_url":"https://pay.example.com/c/cs_3","session_id":"cs_3"}"#)
        .create_async()
        .await;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let worker = service(&server.url());

    action_tx.send(Action::CreateCheckout("future_hn_pack_3".to_string()))?;
    drop(action_tx);
    worker.start(event_tx, &mut action_rx).await?;

    match event_rx.recv().await {
        Some(Event::CheckoutCreated(res)) => {
            assert_eq!(res?.session_id, "cs_3");
        }
        _ => bail!("Wrong event"),
    }

    mock.assert_async().await;
    return Ok(());
}
