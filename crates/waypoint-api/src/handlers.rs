//! Request handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use waypoint_core::models::VerificationAction;
use waypoint_core::{Error, QueryKey};

use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 10;

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NotFound { .. } | Error::UnknownResource(_) => StatusCode::NOT_FOUND,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Conflict { .. } => StatusCode::CONFLICT,
        Error::Network(_) | Error::Timeout(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(error: Error) -> (StatusCode, Json<Value>) {
    (status_for(&error), Json(json!({"error": error.to_string()})))
}

/// `GET /api/{resource}?search=..&status=..&page=n&limit=m`
///
/// Responds with the uniform list envelope, items field named after the
/// resource.
pub async fn list_resource(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let page = params
        .remove("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    let limit = params
        .remove("limit")
        .and_then(|l| l.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let key = QueryKey::new(resource.clone(), params, page);
    let envelope = state.lists.fetch_page(&key, limit).await.map_err(reject)?;

    // Items field is named after the resource, matching the wire contract.
    let mut body = serde_json::Map::new();
    body.insert(resource, Value::Array(envelope.rows));
    body.insert(
        "pagination".to_string(),
        serde_json::to_value(&envelope.pagination).map_err(|e| reject(e.into()))?,
    );
    if let Some(stats) = envelope.stats {
        body.insert("stats".to_string(), stats);
    }
    Ok(Json(Value::Object(body)))
}

/// `POST /api/verifications/{id}/{action}` — approve or reject a request,
/// returning the updated row.
pub async fn verification_action(
    State(state): State<Arc<AppState>>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let action: VerificationAction = action.parse().map_err(reject)?;
    let updated = state
        .mutations
        .verification_action(&id, action)
        .await
        .map_err(reject)?;
    Ok(Json(updated))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
