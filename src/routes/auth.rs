use axum::{routing::post, Router};
use crate::state::AppState;
use crate::handlers::auth::{login, logout};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login/", post(login))
        .route("/logout/", post(logout))
}
