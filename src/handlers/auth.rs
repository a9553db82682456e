use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::auth::jwt::sign_session;
use crate::auth::session::{build_expired_cookie, build_session_cookie};
use crate::dtos::auth::{AuthResponse, LoginRequest};
use crate::error::AppError;
use crate::middleware::auth::session_claims;
use crate::state::AppState;

const LOGIN_REJECTED: &str = "Invalid credentials or not admin";

/// Only a JSON object is a login payload; serde would also accept an array.
fn parse_login(body: &[u8]) -> Option<LoginRequest> {
    match serde_json::from_slice::<Value>(body).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

// POST /login/ - open a session for an admin
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let Some(payload) = parse_login(&body) else {
        return Ok((StatusCode::BAD_REQUEST, Json(AuthResponse::failed("Malformed request body"))).into_response());
    };

    let user = match state
        .backend
        .authenticate(payload.email.as_deref(), payload.password.as_deref())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!(?e, "Authentication backend failed");
            None
        }
    };

    // Wrong password, unknown email, inactive account and non-admin all look the same.
    let Some(user) = user.filter(|u| u.is_admin()) else {
        info!("Login rejected");
        return Ok((StatusCode::UNAUTHORIZED, Json(AuthResponse::failed(LOGIN_REJECTED))).into_response());
    };

    if let Some(previous) = session_claims(&state, &headers) {
        state.sessions.destroy(&previous.sid);
    }

    let settings = &state.session_settings;
    let session_id = state.sessions.create(user.id);
    let ttl = chrono::Duration::from_std(settings.ttl)
        .map_err(|e| AppError::internal(format!("Session TTL out of range: {e}")))?;
    let token = sign_session(user.id, &session_id, ttl, &settings.secret)?;
    let cookie = HeaderValue::from_str(&build_session_cookie(settings, &token))
        .map_err(|e| AppError::internal(format!("Failed to create cookie header: {e}")))?;

    info!(user_id = user.id, "Admin logged in");
    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse::ok("Login successful"))).into_response())
}

// POST /logout/ - always succeeds
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(claims) = session_claims(&state, &headers) {
        state.sessions.destroy(&claims.sid);
        info!(user_id = claims.sub, "Logged out");
    }

    let cookie = HeaderValue::from_str(&build_expired_cookie(&state.session_settings))
        .map_err(|e| AppError::internal(format!("Failed to create cookie header: {e}")))?;

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse::ok("Logout successful"))).into_response())
}
