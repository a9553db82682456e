// src/state.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::auth::{EmailBackend, PasswordHasher, SessionStore};
use crate::config::SessionSettings;
use crate::repository::StatsRepository;

/// Source of "today" for the vacation partitions.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn StatsRepository>,
    pub backend: EmailBackend,
    pub sessions: Arc<SessionStore>,
    pub session_settings: Arc<SessionSettings>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn StatsRepository>,
        hasher: PasswordHasher,
        session_settings: SessionSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let backend = EmailBackend::new(repo.clone(), hasher);
        let sessions = Arc::new(SessionStore::new(session_settings.ttl));
        Self {
            repo,
            backend,
            sessions,
            session_settings: Arc::new(session_settings),
            clock,
        }
    }
}
