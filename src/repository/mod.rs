//! Read access to the tables owned by the vacation site.
//!
//! The stats service never writes to these tables; every query here is a
//! lookup or an aggregate.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dtos::stats::DestinationLikes;
use crate::error::AppResult;
use crate::models::User;

pub use memory::InMemoryRepository;
pub use postgres::PgStatsRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct VacationCounts {
    pub past: i64,
    pub ongoing: i64,
    pub future: i64,
}

impl VacationCounts {
    pub fn total(&self) -> i64 {
        self.past + self.ongoing + self.future
    }
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>>;
    /// Partitions every vacation into past, ongoing and future relative to `today`.
    async fn vacation_counts(&self, today: NaiveDate) -> AppResult<VacationCounts>;
    async fn count_users(&self) -> AppResult<i64>;
    async fn count_likes(&self) -> AppResult<i64>;
    /// One entry per vacation, zero-like vacations included, most liked first.
    /// Ties are ordered by vacation id.
    async fn likes_distribution(&self) -> AppResult<Vec<DestinationLikes>>;
}
