use std::sync::Arc;

use tracing::warn;

use super::password::PasswordHasher;
use crate::error::AppResult;
use crate::models::User;
use crate::repository::StatsRepository;

/// Authenticates users by email address against the stored password hash.
///
/// Every negative outcome (unknown email, wrong password, inactive account,
/// missing input, unreadable hash) is reported as `Ok(None)` so callers cannot
/// tell them apart. Only repository failures surface as errors.
#[derive(Clone)]
pub struct EmailBackend {
    repo: Arc<dyn StatsRepository>,
    hasher: PasswordHasher,
}

impl EmailBackend {
    pub fn new(repo: Arc<dyn StatsRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn authenticate(&self, email: Option<&str>, password: Option<&str>) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (email, password) else {
            return Ok(None);
        };

        let Some(user) = self.repo.find_user_by_email(email).await? else {
            // Hash anyway so unknown emails cost as much as known ones.
            let _ = self.hasher.make_password(password);
            return Ok(None);
        };

        let matches = match self.hasher.check_password(password, &user.password) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Stored password hash could not be checked");
                false
            }
        };

        Ok((matches && user.can_authenticate()).then_some(user))
    }

    /// Rehydrates the user behind a session; inactive users are dropped.
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let user = self.repo.find_user_by_id(user_id).await?;
        Ok(user.filter(User::can_authenticate))
    }
}
