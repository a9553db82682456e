use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::dtos::stats::{DestinationLikes, TotalLikesResponse, TotalUsersResponse, VacationStatsResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

// GET /stats/vacations/ - past / ongoing / future counts relative to today
#[instrument(skip_all, fields(user_id = auth.user_id))]
pub async fn vacation_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<VacationStatsResponse>, AppError> {
    let today = state.clock.today();
    let counts = state.repo.vacation_counts(today).await?;
    Ok(Json(counts.into()))
}

// GET /total/users/
#[instrument(skip_all, fields(user_id = auth.user_id))]
pub async fn total_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TotalUsersResponse>, AppError> {
    let total_users = state.repo.count_users().await?;
    Ok(Json(TotalUsersResponse { total_users }))
}

// GET /total/likes/
#[instrument(skip_all, fields(user_id = auth.user_id))]
pub async fn total_likes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TotalLikesResponse>, AppError> {
    let total_likes = state.repo.count_likes().await?;
    Ok(Json(TotalLikesResponse { total_likes }))
}

// GET /distribution/likes/ - likes per vacation, most liked first
#[instrument(skip_all, fields(user_id = auth.user_id))]
pub async fn likes_distribution(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<DestinationLikes>>, AppError> {
    let rows = state.repo.likes_distribution().await?;
    Ok(Json(rows))
}
