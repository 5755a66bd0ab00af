//! Integration tests for the HTTP store client.
//!
//! These run the client against a local mock server speaking the
//! subscriptions REST contract.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use subledger_core::{
    ActionOutcome, AddForm, ExpiryHorizon, HttpStore, LifecycleController, NewSubscription,
    ScriptedInteraction, Severity, StoreError, SubscriptionId, SubscriptionStore, UserContext,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn store_for(server: &MockServer) -> HttpStore {
    HttpStore::new(&format!("{}/api", server.uri())).unwrap()
}

#[tokio::test]
async fn list_sends_user_scope_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .and(query_param("userId", "u-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "b2", "service": "Spotify", "endDate": "2025-03-01T00:00:00.000Z"},
            {"_id": "a1", "service": "Netflix", "endDate": "2025-02-01"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let listed = store.list(&UserContext::new("u-42")).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, SubscriptionId::new("b2"));
    assert_eq!(listed[0].end_date, date(2025, 3, 1));
    assert_eq!(listed[1].service, "Netflix");
}

#[tokio::test]
async fn list_without_user_sends_empty_scope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .and(query_param("userId", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    assert!(store.list(&UserContext::anonymous()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let err = store.list(&UserContext::new("u")).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn list_garbage_body_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let err = store.list(&UserContext::new("u")).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn create_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .and(body_json(json!({
            "userId": "u-1",
            "service": "Netflix",
            "endDate": "2025-09-30"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "new-1",
            "userId": "u-1",
            "service": "Netflix",
            "endDate": "2025-09-30T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let draft = NewSubscription {
        service: "Netflix".into(),
        end_date: date(2025, 9, 30),
    };
    let created = store
        .create(&UserContext::new("u-1"), &draft)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id, SubscriptionId::new("new-1"));
    assert_eq!(created.end_date, date(2025, 9, 30));
}

#[tokio::test]
async fn create_accepted_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let draft = NewSubscription {
        service: "Netflix".into(),
        end_date: date(2025, 9, 30),
    };
    let created = store.create(&UserContext::new("u"), &draft).await.unwrap();

    assert!(created.is_none());
}

#[tokio::test]
async fn renew_accepted_with_message_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/subscriptions/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Subscription updated"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let renewed = store
        .renew(&SubscriptionId::new("abc"), date(2026, 1, 15))
        .await
        .unwrap();

    assert!(renewed.is_none());
}

#[tokio::test]
async fn add_completes_when_create_returns_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "n1", "service": "Netflix", "endDate": "2030-09-30"}
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let controller =
        LifecycleController::new(store, ScriptedInteraction::new(), UserContext::new("u"));
    let mut form = AddForm::known("Netflix", "2030-09-30");

    let outcome = controller.add(&mut form).await;

    assert_eq!(outcome, ActionOutcome::Completed);
    assert!(form.is_blank());
    assert_eq!(controller.subscriptions().len(), 1);
    let status = controller.status().unwrap();
    assert_eq!(status.severity, Severity::Success);
    assert_eq!(status.text, "Subscription for Netflix created successfully!");
}

#[tokio::test]
async fn create_rejected_is_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("endDate is invalid"))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let draft = NewSubscription {
        service: "Netflix".into(),
        end_date: date(2025, 9, 30),
    };
    let err = store.create(&UserContext::new("u"), &draft).await.unwrap_err();

    assert_eq!(err, StoreError::Validation("endDate is invalid".into()));
}

#[tokio::test]
async fn renew_puts_new_end_date() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/subscriptions/abc"))
        .and(body_json(json!({"endDate": "2026-01-15"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "abc", "service": "HBO", "endDate": "2026-01-15"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let renewed = store
        .renew(&SubscriptionId::new("abc"), date(2026, 1, 15))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renewed.end_date, date(2026, 1, 15));
}

#[tokio::test]
async fn delete_acknowledged_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/subscriptions/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/subscriptions/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    store.delete(&SubscriptionId::new("abc")).await.unwrap();

    let err = store
        .delete(&SubscriptionId::new("missing"))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Transport("404 Not Found".into()));
}

#[tokio::test]
async fn list_expiring_hits_notifications() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions/notifications"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "1", "service": "Spotify", "endDate": "2025-01-12"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let expiring = store
        .list_expiring(&UserContext::new("u"), ExpiryHorizon::DEFAULT)
        .await
        .unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].service, "Spotify");
}

#[tokio::test]
async fn unreachable_server_is_transport() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let store = HttpStore::new(&format!("{uri}/api")).unwrap();
    let err = store.list(&UserContext::new("u")).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}
