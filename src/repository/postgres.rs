use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use super::{StatsRepository, VacationCounts};
use crate::dtos::stats::DestinationLikes;
use crate::error::{AppError, AppResult};
use crate::models::User;

// Django may have created the ids as INTEGER; they are read as BIGINT.
const USER_COLUMNS: &str = "u.id::BIGINT AS id, u.email, u.password, u.first_name, u.last_name,
                u.is_active, u.is_staff, u.is_superuser, r.role_name
         FROM users u
         JOIN roles r ON r.id = u.role_id";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    role_name: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role_name
            .parse()
            .map_err(|_| AppError::internal(format!("user {} has unknown role '{}'", row.id, row.role_name)))?;
        Ok(User {
            id: row.id,
            email: row.email,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        })
    }
}

/// Unmanaged view over the vacation site's Postgres tables.
#[derive(Clone)]
pub struct PgStatsRepository {
    db_pool: PgPool,
}

impl PgStatsRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn vacation_counts(&self, today: NaiveDate) -> AppResult<VacationCounts> {
        let counts = sqlx::query_as::<_, VacationCounts>(
            "SELECT COUNT(*) FILTER (WHERE end_date < $1)                      AS past,
                    COUNT(*) FILTER (WHERE start_date <= $1 AND end_date >= $1) AS ongoing,
                    COUNT(*) FILTER (WHERE start_date > $1)                    AS future
             FROM vacations",
        )
        .bind(today)
        .fetch_one(&self.db_pool)
        .await?;
        Ok(counts)
    }

    async fn count_users(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(total)
    }

    async fn count_likes(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(total)
    }

    async fn likes_distribution(&self) -> AppResult<Vec<DestinationLikes>> {
        let rows = sqlx::query_as::<_, DestinationLikes>(
            "SELECT c.country_name AS destination, COUNT(l.id) AS likes
             FROM vacations v
             JOIN countries c ON c.id = v.country_id
             LEFT JOIN likes l ON l.vacation_id = v.id
             GROUP BY v.id, c.country_name
             ORDER BY likes DESC, v.id ASC",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(rows)
    }
}
