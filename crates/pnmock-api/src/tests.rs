//! Router tests against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{TimeZone, Utc};
use pnmock_core::{DomainEnv, env::DEFAULT_API_KEY, record::Record, store::RecordRepository};
use pnmock_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{API_KEY_HEADER, api_router};

fn app(store: &MemoryStore) -> Router {
  let env = DomainEnv::fixed(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
  api_router(Arc::new(store.clone()), env)
}

async fn call(
  store: &MemoryStore,
  method: Method,
  uri: &str,
  api_key: &str,
  body: Option<Value>,
) -> Response {
  let builder = Request::builder()
    .method(method)
    .uri(uri)
    .header(API_KEY_HEADER, api_key);
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  app(store).oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn new_notification() -> Value {
  json!({
    "paProtocolNumber": "PROTO-7",
    "subject": "Fine",
    "abstract": null,
    "recipients": [{
      "recipientType": "PF",
      "taxId": "FRMTTR76M06B715E",
      "denomination": "Mario Rossi",
      "digitalDomicile": null,
      "physicalAddress": null
    }],
    "notificationFeePolicy": "FLAT_RATE",
    "physicalCommunicationType": "AR_REGISTERED_LETTER",
    "group": null,
    "idempotenceToken": null,
    "taxonomyCode": null
  })
}

/// Send a notification and return its iun.
async fn send(store: &MemoryStore) -> String {
  let resp = call(
    store,
    Method::POST,
    "/delivery/v2.3/requests",
    DEFAULT_API_KEY,
    Some(new_notification()),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::ACCEPTED);

  let body = body_json(resp).await;
  let request_id = body["notificationRequestId"].as_str().unwrap();
  String::from_utf8(B64.decode(request_id).unwrap()).unwrap()
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn sent_notification_is_visible() {
  let store = MemoryStore::new();
  let iun = send(&store).await;

  let resp = call(
    &store,
    Method::GET,
    &format!("/delivery/v2.3/notifications/sent/{iun}"),
    DEFAULT_API_KEY,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = body_json(resp).await;
  assert_eq!(body["iun"], iun);
  assert_eq!(body["notificationStatus"], "ACCEPTED");
  assert_eq!(body["recipients"][0]["denomination"], "Mario Rossi");
  assert!(body.get("cancelledIun").is_none());
}

#[tokio::test]
async fn cancelled_notification_stays_cancelled() {
  let store = MemoryStore::new();
  let iun = send(&store).await;
  let detail_uri = format!("/delivery/v2.3/notifications/sent/{iun}");

  let resp = call(
    &store,
    Method::PUT,
    &format!("/delivery/v2.3/notifications/{iun}/cancel"),
    DEFAULT_API_KEY,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::ACCEPTED);
  assert_eq!(body_json(resp).await["status"], "OK");

  for _ in 0..2 {
    let resp = call(&store, Method::GET, &detail_uri, DEFAULT_API_KEY, None).await;
    let body = body_json(resp).await;
    assert_eq!(body["notificationStatus"], "CANCELLED");
    assert_eq!(body["cancelledIun"], iun);

    let ids: Vec<&str> = body["timeline"]
      .as_array()
      .unwrap()
      .iter()
      .filter_map(|e| e["elementId"].as_str())
      .collect();
    assert_eq!(ids, vec![
      format!("REQUEST_ACCEPTED.IUN_{iun}"),
      format!("NOTIFICATION_CANCELLATION_REQUEST.IUN_{iun}"),
      format!("NOTIFICATION_CANCELLED.IUN_{iun}"),
    ]);
  }
}

#[tokio::test]
async fn invalid_key_is_forbidden() {
  let store = MemoryStore::new();
  let iun = send(&store).await;

  let resp = call(
    &store,
    Method::GET,
    &format!("/delivery/v2.3/notifications/sent/{iun}"),
    "wrong",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert!(body_json(resp).await["message"].is_string());
}

#[tokio::test]
async fn unknown_iun_is_not_found() {
  let store = MemoryStore::new();
  let resp = call(
    &store,
    Method::GET,
    "/delivery/v2.3/notifications/sent/NOPE",
    DEFAULT_API_KEY,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  assert!(bytes.is_empty());
}

#[tokio::test]
async fn cancelling_unknown_iun_is_not_found() {
  let store = MemoryStore::new();
  let resp = call(
    &store,
    Method::PUT,
    "/delivery/v2.3/notifications/NOPE/cancel",
    DEFAULT_API_KEY,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Streams ─────────────────────────────────────────────────────────────────

fn stream_body(title: &str) -> Value {
  json!({ "title": title, "eventType": "STATUS", "filterValues": ["ACCEPTED"] })
}

async fn create_stream(store: &MemoryStore, title: &str) -> String {
  let resp = call(
    store,
    Method::POST,
    "/delivery-progresses/v2.3/streams",
    DEFAULT_API_KEY,
    Some(stream_body(title)),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["streamId"].as_str().unwrap().to_owned()
}

async fn stream_titles(store: &MemoryStore) -> Vec<String> {
  let resp = call(
    store,
    Method::GET,
    "/delivery-progresses/v2.3/streams",
    DEFAULT_API_KEY,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  body_json(resp)
    .await
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["title"].as_str().unwrap().to_owned())
    .collect()
}

#[tokio::test]
async fn stream_lifecycle() {
  let store = MemoryStore::new();
  let a = create_stream(&store, "a").await;
  create_stream(&store, "b").await;
  assert_eq!(stream_titles(&store).await, vec!["a", "b"]);

  let uri = format!("/delivery-progresses/v2.3/streams/{a}");
  let resp = call(&store, Method::PUT, &uri, DEFAULT_API_KEY, Some(stream_body("a2"))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(body_json(resp).await["streamId"], a);
  assert_eq!(stream_titles(&store).await, vec!["b", "a2"]);

  let resp = call(&store, Method::DELETE, &uri, DEFAULT_API_KEY, None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  assert_eq!(stream_titles(&store).await, vec!["b"]);

  let resp = call(&store, Method::DELETE, &uri, DEFAULT_API_KEY, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unauthorized_delete_keeps_the_stream() {
  let store = MemoryStore::new();
  let a = create_stream(&store, "a").await;

  let uri = format!("/delivery-progresses/v2.3/streams/{a}");
  let resp = call(&store, Method::DELETE, &uri, "wrong", None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(stream_titles(&store).await, vec!["a"]);

  let kinds: Vec<&str> = store
    .list()
    .await
    .unwrap()
    .iter()
    .map(Record::discriminant)
    .filter(|kind| *kind == "DeleteStreamRecord")
    .collect();
  assert_eq!(kinds, vec!["DeleteStreamRecord"]);
}

#[tokio::test]
async fn replacing_unknown_stream_is_not_found() {
  let store = MemoryStore::new();
  let uri = format!(
    "/delivery-progresses/v2.3/streams/{}",
    uuid::Uuid::new_v4()
  );
  let resp = call(&store, Method::PUT, &uri, DEFAULT_API_KEY, Some(stream_body("x"))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(stream_titles(&store).await.is_empty());
}

#[tokio::test]
async fn listing_streams_requires_the_key() {
  let store = MemoryStore::new();
  let resp = call(
    &store,
    Method::GET,
    "/delivery-progresses/v2.3/streams",
    "wrong",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ─── Audit ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_exchange_is_recorded() {
  let store = MemoryStore::new();
  let iun = send(&store).await;
  call(
    &store,
    Method::GET,
    &format!("/delivery/v2.3/notifications/sent/{iun}"),
    "wrong",
    None,
  )
  .await;

  let kinds: Vec<&str> = store
    .list()
    .await
    .unwrap()
    .iter()
    .map(Record::discriminant)
    .collect();
  assert_eq!(kinds, vec![
    "NewNotificationRecord",
    "RequestResponseRecord",
    "GetNotificationDetailRecord",
    "RequestResponseRecord",
  ]);

  let resp = call(&store, Method::GET, "/records", DEFAULT_API_KEY, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await.as_array().unwrap().len(), 4);
}
