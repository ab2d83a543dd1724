use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::MockEngine;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub cataloged_types: usize,
}

pub struct HealthHandler {
    engine: Arc<MockEngine>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(engine: Arc<MockEngine>) -> Self {
        Self {
            engine,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if the server is running. An empty
    /// catalog is still healthy; a source directory with no definitions is a
    /// valid state.
    pub async fn health(&self) -> impl IntoResponse {
        let catalog = self.engine.snapshot().await;
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            cataloged_types: catalog.len(),
        };
        (StatusCode::OK, Json(status))
    }
}
