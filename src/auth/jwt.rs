use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by the session cookie. `sid` must also be live in the
/// server-side session store for the cookie to be honoured.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub sid: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn sign_session(user_id: i64, session_id: &str, ttl: Duration, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + ttl;
    let claims = SessionClaims {
        sub: user_id,
        sid: session_id.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Session signing failed: {e}")))
}

/// Any decoding failure (bad signature, expiry, garbage) is an authentication
/// failure.
pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|d| d.claims)
    .map_err(|_| AppError::Unauthorized)
}
