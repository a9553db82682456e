pub mod auth;
pub mod stats;

use axum::Router;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(stats::routes(state))
}
