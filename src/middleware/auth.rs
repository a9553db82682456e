use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::auth::jwt::{verify_session, SessionClaims};
use crate::auth::session::cookie_value;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

/// The admin behind the current request, attached by [`require_admin`].
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
}

/// Decodes the session cookie and checks the session is still open.
pub fn session_claims(state: &AppState, headers: &HeaderMap) -> Option<SessionClaims> {
    let settings = &state.session_settings;
    let token = cookie_value(headers, &settings.cookie_name)?;
    let claims = verify_session(&token, &settings.secret).ok()?;
    state.sessions.is_live(&claims.sid, claims.sub).then_some(claims)
}

/// Resolves the logged-in user, reloading it from the repository so role and
/// activity changes apply to the very next request.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> AppResult<Option<User>> {
    match session_claims(state, headers) {
        Some(claims) => state.backend.get_user(claims.sub).await,
        None => Ok(None),
    }
}

/// 401 without a valid session, 403 for a logged-in non-admin.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match current_user(&state, req.headers()).await {
        Ok(Some(user)) => user,
        Ok(None) => return AppError::Unauthorized.into_response(),
        Err(e) => return e.into_response(),
    };

    if !user.is_admin() {
        warn!(user_id = user.id, path = %req.uri().path(), "Non-admin user refused");
        return AppError::forbidden("Admin access required").into_response();
    }

    req.extensions_mut().insert(AuthContext { user_id: user.id });

    next.run(req).await
}
