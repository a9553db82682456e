use serde::{Deserialize, Serialize};

use crate::repository::VacationCounts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationStatsResponse {
    pub past_vacations: i64,
    pub ongoing_vacations: i64,
    pub future_vacations: i64,
}

impl From<VacationCounts> for VacationStatsResponse {
    fn from(counts: VacationCounts) -> Self {
        Self {
            past_vacations: counts.past,
            ongoing_vacations: counts.ongoing,
            future_vacations: counts.future,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalUsersResponse {
    pub total_users: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalLikesResponse {
    pub total_likes: i64,
}

/// One entry of the likes distribution: a vacation's country and its like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DestinationLikes {
    pub destination: String,
    pub likes: i64,
}
