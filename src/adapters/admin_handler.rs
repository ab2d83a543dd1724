//! Operator endpoints: cache inspection/reset and catalog listing.

use crate::adapters::api_handler::ApiState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct TypeSummary {
    name: String,
    source_file: PathBuf,
    field_count: usize,
}

/// GET /__proteus/cache
pub async fn cache_stats(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.engine.cache().stats().await)
}

/// DELETE /__proteus/cache
pub async fn clear_cache(State(state): State<ApiState>) -> impl IntoResponse {
    state.engine.cache().clear().await;
    StatusCode::NO_CONTENT
}

/// GET /__proteus/types
pub async fn list_types(State(state): State<ApiState>) -> impl IntoResponse {
    let catalog = state.engine.snapshot().await;
    let mut types: Vec<TypeSummary> = catalog
        .descriptors()
        .map(|desc| TypeSummary {
            name: desc.name.clone(),
            source_file: desc.source_file.clone(),
            field_count: desc.fields.len(),
        })
        .collect();
    types.sort_by(|a, b| a.name.cmp(&b.name));
    Json(json!({ "count": types.len(), "types": types }))
}
