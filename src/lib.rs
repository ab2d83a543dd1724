//! # Proteus - Interface-Driven Mock API Server
//!
//! Proteus synthesizes a REST API on the fly from TypeScript interface
//! definitions found in one or more source directories, instead of requiring
//! hand-written route handlers.
//!
//! ## Features
//!
//! - **Zero configuration**: drop `.ts` files in a directory, get endpoints
//! - **Inflection-aware routing**: `/users` serves an array of `User`,
//!   `/user` a single one, `/people` an array of `Person`
//! - **Prioritized sources**: multiple directories, first definition wins
//! - **Live reload**: edits to interface files rebuild the catalog atomically
//! - **Proxy mode**: routes without a local definition forward to a real
//!   backend; local definitions always win
//! - **Stable singles, varied lists**: singular responses are cached until
//!   their source file changes, array responses vary on every call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clap::Parser;
//! use proteus::cli::Cli;
//! use proteus::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_from(["proteus", "--dir", "./interfaces"]);
//!     let settings = Settings::new_with_cli(&cli)?;
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: core types and the error taxonomy
//! - **Engine**: scanner, extractor, catalog, resolver, gate, cache, watcher
//! - **Adapters**: axum serving layer, payload generator, upstream forwarder
//! - **Config**: configuration management

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;

use crate::adapters::admin_handler;
use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Creates the axum application router.
///
/// Health and admin endpoints are routed explicitly; everything else falls
/// through to the resolver-driven mock/proxy handler.
pub fn create_app(state: ApiState, health_handler: Arc<HealthHandler>) -> Router {
    let admin_router = Router::new()
        .route(
            "/cache",
            get(admin_handler::cache_stats).delete(admin_handler::clear_cache),
        )
        .route("/types", get(admin_handler::list_types));

    Router::new()
        .route(
            "/health",
            get({
                let handler = health_handler.clone();
                move || {
                    let h = handler.clone();
                    async move { h.health().await }
                }
            }),
        )
        .nest("/__proteus", admin_router)
        .fallback(api_handler::handle)
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
