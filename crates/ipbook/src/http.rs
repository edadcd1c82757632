//! HTTP layer for ipbook.
//!
//! Exposes the two endpoints the browser client calls, `GET /ips.json`
//! and `POST /save-ips.php`, plus a landing page and a liveness probe.
//! Error bodies are `{"message": ...}` objects, matching what the client
//! already displays. The save body is parsed by hand so malformed JSON is
//! answered with exactly 400.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::config::AccessConfig;
use crate::record::IpRecord;
use crate::store::Store;

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The persistence backend.
    pub store: Arc<dyn Store>,
    /// Role toggles applied per request.
    pub access: AccessConfig,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create state over a store with default access and body limit.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            access: AccessConfig::default(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Build the application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/healthz", get(healthz_handler))
        .route("/ips.json", get(list_handler))
        .route("/save-ips.php", post(save_handler))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn landing_handler() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn healthz_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /ips.json`: the full record set.
async fn list_handler(State(state): State<AppState>) -> Response {
    if !state.access.can_view {
        return message_response(StatusCode::FORBIDDEN, "Access denied.");
    }

    match state.store.load().await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            error!("inventory load failed: {err}");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error loading IP data.")
        }
    }
}

/// `POST /save-ips.php`: replace the full record set.
///
/// Accepts the whole collection, possibly carrying placeholder date
/// stamps; responds with the stamped, persisted collection.
async fn save_handler(State(state): State<AppState>, body: Bytes) -> Response {
    if !state.access.can_edit {
        return message_response(StatusCode::FORBIDDEN, "Access denied.");
    }

    let records: Vec<IpRecord> = match serde_json::from_slice(&body) {
        Ok(records) => records,
        Err(err) => {
            info!("rejecting save with malformed body: {err}");
            return message_response(StatusCode::BAD_REQUEST, "Invalid JSON data.");
        }
    };

    match state.store.save(records).await {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => {
            error!("inventory save failed: {err}");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "Error saving IP data.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DateStamp, IpRecord};
    use crate::store::MemStore;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("parse body")
    }

    fn state_with(store: MemStore) -> AppState {
        AppState::new(Arc::new(store))
    }

    fn sample_record() -> IpRecord {
        IpRecord::unused("10.0.0.5", "255.255.255.0", "10.0.0.1")
    }

    #[tokio::test]
    async fn test_landing() {
        let response = landing_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["name"], "ipbook");
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = healthz_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_returns_records() {
        let state = state_with(MemStore::with_records(vec![sample_record()]));
        let response = list_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["ip"], "10.0.0.5");
    }

    #[tokio::test]
    async fn test_list_denied_without_view_access() {
        let mut state = state_with(MemStore::new());
        state.access.can_view = false;

        let response = list_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Access denied.");
    }

    #[tokio::test]
    async fn test_save_round_trips_and_stamps() {
        let state = state_with(MemStore::new());

        let mut record = sample_record();
        record.last_edited = DateStamp::Pending;
        let payload = serde_json::to_vec(&vec![record]).unwrap();

        let response = save_handler(State(state.clone()), Bytes::from(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        // The pending stamp came back as a concrete date.
        let stamped = body[0]["last_edited"].as_str().unwrap();
        assert_ne!(stamped, crate::record::DATE_PLACEHOLDER);

        let stored = state.store.load().await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_json() {
        let state = state_with(MemStore::with_records(vec![sample_record()]));

        let response =
            save_handler(State(state.clone()), Bytes::from_static(b"{ not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid JSON data.");

        // Nothing was written.
        assert_eq!(state.store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_wrong_shape() {
        let state = state_with(MemStore::new());
        let response =
            save_handler(State(state), Bytes::from_static(b"{\"ip\":\"10.0.0.1\"}")).await;
        // A bare object is not a record array.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_denied_without_edit_access() {
        let mut state = state_with(MemStore::new());
        state.access.can_edit = false;

        let response = save_handler(State(state), Bytes::from_static(b"[]")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_save_write_failure_is_500() {
        let store = MemStore::new();
        store.fail_saves(true);
        let state = state_with(store);

        let response = save_handler(State(state), Bytes::from_static(b"[]")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Error saving IP data.");
    }
}
