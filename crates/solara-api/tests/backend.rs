// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recommendation and conversation clients against mocked backends.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use solara_api::{apply_actions, ConversationClient, OrderSummary, RecommendationClient};
use solara_core::{ApplianceRecord, KeyValueStore, SolaraError};
use solara_session::ApplianceForm;
use solara_storage::{keys, MemoryStore};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn freezer() -> ApplianceRecord {
    let mut record = ApplianceRecord::new();
    record.name = Some("Freezer".into());
    record.quantity = 1;
    record.day_hours = 8.0;
    record.night_hours = 3.0;
    record.wattage = Some(800.0);
    record
}

#[tokio::test]
async fn submit_renders_order_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .and(body_json(json!({
            "items": [{
                "nameOfItem": "Freezer",
                "quantity": 1,
                "dayHours": 8.0,
                "nightHours": 3.0,
                "wattage": 800.0
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendation": {
                "pricing": {"subtotal": 1000000, "vat": 75000, "totalAmount": 1075000}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let client = RecommendationClient::new(server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_store(store.clone());

    let result = client
        .submit(&[freezer()], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(OrderSummary::new(&result).total(), "₦1,075,000");

    let persisted = client.last_result().await.unwrap();
    assert_eq!(persisted, result);
    assert!(store.get(keys::LAST_RECOMMENDATION).await.unwrap().is_some());
}

#[tokio::test]
async fn non_success_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "wattage is required"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let client = RecommendationClient::new(server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_store(store.clone());

    let err = client
        .submit(&[freezer()], &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        SolaraError::Backend { status, message } => {
            assert_eq!(status, Some(422));
            assert_eq!(message, "wattage is required");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn non_success_without_body_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = RecommendationClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = client
        .submit(&[freezer()], &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "backend error (503): Service Unavailable"
    );
}

#[tokio::test]
async fn cancelled_submit_leaves_stored_result_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"recommendation": {}}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .set(keys::LAST_RECOMMENDATION, r#"{"pricing":{"totalAmount":5}}"#)
        .await
        .unwrap();
    let client = RecommendationClient::new(server.uri(), Duration::from_secs(30))
        .unwrap()
        .with_store(store.clone());

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        stopper.cancel();
    });

    let err = client.submit(&[freezer()], &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(
        store
            .get(keys::LAST_RECOMMENDATION)
            .await
            .unwrap()
            .as_deref(),
        Some(r#"{"pricing":{"totalAmount":5}}"#)
    );
}

#[tokio::test]
async fn empty_list_is_rejected_locally() {
    let client = RecommendationClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = client
        .submit(&[], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SolaraError::Validation(_)));
}

#[tokio::test]
async fn conversation_turn_fills_the_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/voice/conversation"))
        .and(body_partial_json(json!({
            "userMessage": "my fridge uses 150 watts",
            "conversationHistory": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "A 150 watt refrigerator, got it.",
            "intent": "add_appliance",
            "actions": [
                {"type": "fill_field", "field": "name", "value": "refrigerator"},
                {"type": "fill_field", "field": "wattage", "value": 150}
            ],
            "suggestions": ["How many hours a day does it run?"]
        })))
        .mount(&server)
        .await;

    let mut client = ConversationClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let reply = client
        .send("my fridge uses 150 watts", json!({"view": "voice-assistant"}))
        .await
        .unwrap();
    assert_eq!(reply.intent.as_deref(), Some("add_appliance"));
    assert_eq!(client.history().len(), 2);

    let mut form = ApplianceForm::new();
    assert_eq!(apply_actions(&mut form, &reply.actions).len(), 2);
    assert!(form.get().is_complete());
}

#[tokio::test]
async fn unsuccessful_conversation_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/voice/conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "response": "I'm having trouble right now."
        })))
        .mount(&server)
        .await;

    let mut client = ConversationClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.send("hello", json!({})).await.unwrap_err();
    assert!(matches!(err, SolaraError::Backend { .. }));
    assert!(client.history().is_empty());
}
