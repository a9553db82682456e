use axum::{routing::get, Router, middleware};
use crate::state::AppState;
use crate::handlers::stats::{vacation_stats, total_users, total_likes, likes_distribution};
use crate::middleware::auth::require_admin;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats/vacations/", get(vacation_stats))
        .route("/total/users/", get(total_users))
        .route("/total/likes/", get(total_likes))
        .route("/distribution/likes/", get(likes_distribution))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
