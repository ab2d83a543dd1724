//! The serving layer: resolves, looks up, decides, then mocks or forwards.

use crate::adapters::generator::GeneratePayload;
use crate::adapters::proxy::UpstreamForwarder;
use crate::config::LatencySettings;
use crate::domain::{EngineError, TypeDescriptor};
use crate::engine::gate::{self, RouteAction};
use crate::engine::{resolver, MockEngine};
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Request header that forces the response status, layered on top of the
/// engine's decision.
pub const FORCE_STATUS_HEADER: &str = "x-mock-status";

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<MockEngine>,
    pub generator: Arc<dyn GeneratePayload>,
    pub forwarder: Option<Arc<UpstreamForwarder>>,
    pub latency: Option<LatencySettings>,
}

/// Catch-all handler. Every path that is not a health or admin route lands
/// here.
pub async fn handle(State(state): State<ApiState>, request: Request) -> Response {
    let forced_status = forced_status(&request);

    if let Some(latency) = state.latency {
        let millis = rand::thread_rng().gen_range(latency.min_ms..=latency.max_ms);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    let mapping = resolver::resolve(request.uri().path());
    let catalog = state.engine.snapshot().await;
    let descriptor = catalog.lookup(&mapping.type_name);

    let action = gate::decide(state.forwarder.is_some(), descriptor.is_some());
    debug!(
        "{} {} resolved to '{}' (array: {}) -> {:?}",
        request.method(),
        request.uri().path(),
        mapping.type_name,
        mapping.is_array,
        action
    );

    let response = match action {
        RouteAction::Forward => {
            let forwarder = state
                .forwarder
                .as_ref()
                .expect("forward action implies a configured upstream")
                .clone();
            forward(forwarder, request).await
        }
        RouteAction::Mock => match descriptor {
            None => error_response(&EngineError::TypeNotFound(mapping.type_name)),
            Some(descriptor) => serve_mock(&state, &descriptor, mapping.is_array).await,
        },
    };

    apply_forced_status(response, forced_status)
}

async fn serve_mock(state: &ApiState, descriptor: &TypeDescriptor, is_array: bool) -> Response {
    if is_array {
        // Array responses are regenerated on every call, never cached.
        return match state.generator.generate_many(descriptor) {
            Ok(payload) => Json(payload).into_response(),
            Err(cause) => error_response(&EngineError::MockGeneration {
                type_name: descriptor.name.clone(),
                cause,
            }),
        };
    }

    let cache = state.engine.cache();
    if let Some(payload) = cache.get(&descriptor.name, &descriptor.source_file).await {
        return Json(payload).into_response();
    }
    match state.generator.generate(descriptor) {
        Ok(payload) => {
            cache
                .set(&descriptor.name, &descriptor.source_file, payload.clone())
                .await;
            Json(payload).into_response()
        }
        Err(cause) => error_response(&EngineError::MockGeneration {
            type_name: descriptor.name.clone(),
            cause,
        }),
    }
}

async fn forward(forwarder: Arc<UpstreamForwarder>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return error_response(&EngineError::UpstreamUnreachable(format!(
                "failed to buffer request body: {}",
                err
            )))
        }
    };

    match forwarder
        .forward(&parts.method, &parts.uri, &parts.headers, body)
        .await
    {
        Ok(forwarded) => {
            let mut response = Response::builder().status(
                StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY),
            );
            for (name, value) in forwarded.headers {
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_bytes(&value),
                ) {
                    response = response.header(name, value);
                }
            }
            response
                .body(Body::from(forwarded.body))
                .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
        }
        Err(err) => error_response(&err),
    }
}

/// Maps the engine error taxonomy onto HTTP statuses with a JSON envelope.
fn error_response(err: &EngineError) -> Response {
    let (status, code) = match err {
        EngineError::TypeNotFound(_) => (StatusCode::NOT_FOUND, "type_not_found"),
        EngineError::MockGeneration { .. } => {
            error!("{:#}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "mock_generation_failed")
        }
        EngineError::UpstreamUnreachable(_) => {
            error!("{}", err);
            (StatusCode::BAD_GATEWAY, "upstream_unreachable")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(json!({
            "error": code,
            "message": err.to_string(),
        })),
    )
        .into_response()
}

fn forced_status(request: &Request) -> Option<StatusCode> {
    let raw = request.headers().get(FORCE_STATUS_HEADER)?.to_str().ok()?;
    StatusCode::from_bytes(raw.as_bytes()).ok()
}

fn apply_forced_status(mut response: Response, forced: Option<StatusCode>) -> Response {
    if let Some(status) = forced {
        *response.status_mut() = status;
    }
    response
}
