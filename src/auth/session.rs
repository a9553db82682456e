use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::config::SessionSettings;

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: i64,
    expires_at: SystemTime,
}

impl SessionRecord {
    fn is_valid(&self) -> bool {
        SystemTime::now() < self.expires_at
    }
}

/// Server-side registry of live login sessions.
///
/// Expired sessions are evicted lazily once the store grows past a threshold.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    ttl: Duration,
    cleanup_threshold: usize,
}

impl SessionStore {
    const DEFAULT_CLEANUP_THRESHOLD: usize = 10_000;

    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            cleanup_threshold: Self::DEFAULT_CLEANUP_THRESHOLD,
        }
    }

    /// Opens a session for `user_id` and returns its id.
    pub fn create(&self, user_id: i64) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(
            id.clone(),
            SessionRecord { user_id, expires_at: SystemTime::now() + self.ttl },
        );
        if sessions.len() > self.cleanup_threshold {
            sessions.retain(|_, s| s.is_valid());
        }
        id
    }

    /// True when `session_id` is unexpired and belongs to `user_id`.
    pub fn is_live(&self, session_id: &str, user_id: i64) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(session_id)
            .is_some_and(|s| s.user_id == user_id && s.is_valid())
    }

    pub fn destroy(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads a cookie value from the request's `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}

pub fn build_session_cookie(settings: &SessionSettings, value: &str) -> String {
    build_cookie(settings, value, settings.ttl.as_secs())
}

/// A cookie that makes the client drop the session immediately.
pub fn build_expired_cookie(settings: &SessionSettings) -> String {
    build_cookie(settings, "", 0)
}

fn build_cookie(settings: &SessionSettings, value: &str, max_age: u64) -> String {
    let mut parts = vec![format!("{}={}", settings.cookie_name, value)];
    parts.push("Path=/".to_string());
    parts.push("HttpOnly".to_string());
    if settings.secure {
        parts.push("Secure".to_string());
    }
    parts.push("SameSite=Lax".to_string());
    parts.push(format!("Max-Age={max_age}"));
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings(secure: bool) -> SessionSettings {
        SessionSettings {
            secret: "secret".into(),
            cookie_name: "sessionid".into(),
            ttl: Duration::from_secs(3600),
            secure,
        }
    }

    #[test]
    fn test_create_and_destroy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let sid = store.create(3);
        assert!(store.is_live(&sid, 3));
        assert!(!store.is_live(&sid, 4));
        store.destroy(&sid);
        assert!(!store.is_live(&sid, 3));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_session_is_not_live() {
        let store = SessionStore::new(Duration::ZERO);
        let sid = store.create(1);
        assert!(!store.is_live(&sid, 1));
    }

    #[test]
    fn test_cleanup_evicts_expired() {
        let mut store = SessionStore::new(Duration::ZERO);
        store.cleanup_threshold = 2;
        for user in 0..3 {
            store.create(user);
        }
        assert!(store.len() <= 2);
    }

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("csrftoken=abc; sessionid=tok.en.x"));
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie_value(&headers, "sessionid").as_deref(), Some("tok.en.x"));
        assert_eq!(cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        assert_eq!(
            build_session_cookie(&settings(false), "v"),
            "sessionid=v; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );
        assert_eq!(
            build_expired_cookie(&settings(true)),
            "sessionid=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0"
        );
    }
}
