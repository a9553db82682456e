//! Admin statistics service for the vacation site.
//!
//! Reads the vacation site's users, vacations and likes, and serves
//! admin-only JSON aggregates behind an email/password session login.

pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Builds the full application router without transport-level layers.
pub fn build_app(state: AppState) -> Router {
    routes::create_router(state.clone())
        .route("/", get(|| async { "Vacation Stats API" }))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
