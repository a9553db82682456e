use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{StatsRepository, VacationCounts};
use crate::dtos::stats::DestinationLikes;
use crate::error::{AppError, AppResult};
use crate::models::{Country, Like, NewVacation, Role, RoleName, User, Vacation, VacationPhase};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// Encoded password hash, as stored by the vacation site.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
struct UserRecord {
    id: i64,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    role_id: i64,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
}

#[derive(Default)]
struct Tables {
    roles: Vec<Role>,
    users: Vec<UserRecord>,
    countries: Vec<Country>,
    vacations: Vec<Vacation>,
    likes: Vec<Like>,
}

impl Tables {
    fn role(&self, role_id: i64) -> AppResult<RoleName> {
        self.roles
            .iter()
            .find(|r| r.id == role_id)
            .map(|r| r.role_name)
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }

    fn to_user(&self, record: &UserRecord) -> AppResult<User> {
        Ok(User {
            id: record.id,
            email: record.email.clone(),
            password: record.password.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            role: self.role(record.role_id)?,
            is_active: record.is_active,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
        })
    }

    fn user_mut(&mut self, user_id: i64) -> AppResult<&mut UserRecord> {
        self.users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }
}

/// Process-local stand-in for the vacation site's database.
///
/// Enforces the same write-time rules as the owning service: unique role
/// names, emails and country names, valid vacation dates and prices, and
/// one like per (user, vacation) pair.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_role(&self, role_name: RoleName) -> AppResult<Role> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if tables.roles.iter().any(|r| r.role_name == role_name) {
            return Err(AppError::conflict(format!("Role '{role_name}' already exists")));
        }
        let role = Role { id: tables.roles.len() as i64 + 1, role_name };
        tables.roles.push(role.clone());
        Ok(role)
    }

    pub fn insert_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if new_user.email.trim().is_empty() {
            return Err(AppError::validation("The Email field must be set"));
        }
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email already exists"));
        }
        tables.role(new_user.role_id)?;

        let record = UserRecord {
            id: tables.users.len() as i64 + 1,
            email: new_user.email,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role_id: new_user.role_id,
            is_active: new_user.is_active,
            is_staff: false,
            is_superuser: false,
        };
        let user = tables.to_user(&record)?;
        tables.users.push(record);
        Ok(user)
    }

    pub fn set_user_role(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.role(role_id)?;
        tables.user_mut(user_id)?.role_id = role_id;
        Ok(())
    }

    pub fn set_user_active(&self, user_id: i64, is_active: bool) -> AppResult<()> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.user_mut(user_id)?.is_active = is_active;
        Ok(())
    }

    pub fn insert_country(&self, country_name: &str) -> AppResult<Country> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if tables.countries.iter().any(|c| c.country_name == country_name) {
            return Err(AppError::conflict(format!("Country '{country_name}' already exists")));
        }
        let country = Country {
            id: tables.countries.len() as i64 + 1,
            country_name: country_name.to_string(),
        };
        tables.countries.push(country.clone());
        Ok(country)
    }

    pub fn insert_vacation(&self, new_vacation: NewVacation) -> AppResult<Vacation> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if !tables.countries.iter().any(|c| c.id == new_vacation.country_id) {
            return Err(AppError::not_found(format!("Country {} not found", new_vacation.country_id)));
        }
        let vacation = new_vacation.into_vacation(tables.vacations.len() as i64 + 1)?;
        tables.vacations.push(vacation.clone());
        Ok(vacation)
    }

    pub fn insert_like(&self, user_id: i64, vacation_id: i64) -> AppResult<Like> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        if !tables.vacations.iter().any(|v| v.id == vacation_id) {
            return Err(AppError::not_found(format!("Vacation {vacation_id} not found")));
        }
        if tables.likes.iter().any(|l| l.user_id == user_id && l.vacation_id == vacation_id) {
            return Err(AppError::conflict("User already likes this vacation"));
        }
        let like = Like { id: tables.likes.len() as i64 + 1, user_id, vacation_id };
        tables.likes.push(like.clone());
        Ok(like)
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| tables.to_user(u))
            .transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| tables.to_user(u))
            .transpose()
    }

    async fn vacation_counts(&self, today: NaiveDate) -> AppResult<VacationCounts> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let mut counts = VacationCounts::default();
        for vacation in &tables.vacations {
            match vacation.phase(today) {
                VacationPhase::Past => counts.past += 1,
                VacationPhase::Ongoing => counts.ongoing += 1,
                VacationPhase::Future => counts.future += 1,
            }
        }
        Ok(counts)
    }

    async fn count_users(&self) -> AppResult<i64> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.users.len() as i64)
    }

    async fn count_likes(&self) -> AppResult<i64> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.likes.len() as i64)
    }

    async fn likes_distribution(&self) -> AppResult<Vec<DestinationLikes>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let mut rows = Vec::with_capacity(tables.vacations.len());
        for vacation in &tables.vacations {
            let destination = tables
                .countries
                .iter()
                .find(|c| c.id == vacation.country_id)
                .map(|c| c.country_name.clone())
                .ok_or_else(|| AppError::internal(format!("vacation {} has no country", vacation.id)))?;
            let likes = tables.likes.iter().filter(|l| l.vacation_id == vacation.id).count() as i64;
            rows.push((vacation.id, DestinationLikes { destination, likes }));
        }
        rows.sort_by(|(a_id, a), (b_id, b)| b.likes.cmp(&a.likes).then(a_id.cmp(b_id)));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn vacation(country_id: i64, start: i64, end: i64) -> NewVacation {
        NewVacation {
            country_id,
            description: "Trip".into(),
            start_date: today() + Duration::days(start),
            end_date: today() + Duration::days(end),
            price: 1500.0,
            image_file: "trip.jpg".into(),
        }
    }

    fn seeded() -> (InMemoryRepository, User, User) {
        let repo = InMemoryRepository::new();
        let admin = repo.insert_role(RoleName::Admin).unwrap();
        let user = repo.insert_role(RoleName::User).unwrap();
        let new_user = |email: &str, role_id| NewUser {
            email: email.into(),
            password: "!".into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            role_id,
            is_active: true,
        };
        let a = repo.insert_user(new_user("admin@test.com", admin.id)).unwrap();
        let u = repo.insert_user(new_user("user@test.com", user.id)).unwrap();
        (repo, a, u)
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let (repo, _, _) = seeded();
        assert!(matches!(repo.insert_role(RoleName::Admin), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (repo, admin, _) = seeded();
        let err = repo
            .insert_user(NewUser {
                email: admin.email.clone(),
                password: "!".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                role_id: 1,
                is_active: true,
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_like_is_unique_per_pair() {
        let (repo, admin, _) = seeded();
        let italy = repo.insert_country("Italy").unwrap();
        let v = repo.insert_vacation(vacation(italy.id, 1, 5)).unwrap();
        repo.insert_like(admin.id, v.id).unwrap();
        assert!(matches!(repo.insert_like(admin.id, v.id), Err(AppError::Conflict(_))));
        assert!(matches!(repo.insert_like(admin.id, 99), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_invalid_vacation_rejected() {
        let (repo, _, _) = seeded();
        let italy = repo.insert_country("Italy").unwrap();
        assert!(matches!(repo.insert_vacation(vacation(italy.id, 5, 5)), Err(AppError::ValidationError(_))));
        assert!(matches!(repo.insert_vacation(vacation(42, 1, 5)), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_counts_partition_all_vacations() {
        let (repo, _, _) = seeded();
        let italy = repo.insert_country("Italy").unwrap();
        for (start, end) in [(-20, -10), (-5, 5), (0, 1), (-1, 0), (10, 20), (1, 2)] {
            repo.insert_vacation(vacation(italy.id, start, end)).unwrap();
        }

        let counts = repo.vacation_counts(today()).await.unwrap();
        assert_eq!(counts, VacationCounts { past: 1, ongoing: 3, future: 2 });
        assert_eq!(counts.total(), 6);
    }

    #[tokio::test]
    async fn test_distribution_includes_zero_likes_and_sorts() {
        let (repo, admin, user) = seeded();
        let italy = repo.insert_country("Italy").unwrap();
        let spain = repo.insert_country("Spain").unwrap();
        let rome = repo.insert_vacation(vacation(italy.id, -20, -10)).unwrap();
        let madrid = repo.insert_vacation(vacation(spain.id, -5, 5)).unwrap();
        repo.insert_vacation(vacation(italy.id, 10, 20)).unwrap();
        repo.insert_like(user.id, madrid.id).unwrap();
        repo.insert_like(admin.id, madrid.id).unwrap();
        repo.insert_like(user.id, rome.id).unwrap();

        let rows = repo.likes_distribution().await.unwrap();
        let pairs: Vec<(&str, i64)> = rows.iter().map(|r| (r.destination.as_str(), r.likes)).collect();
        assert_eq!(pairs, vec![("Spain", 2), ("Italy", 1), ("Italy", 0)]);
        assert_eq!(rows.iter().map(|r| r.likes).sum::<i64>(), repo.count_likes().await.unwrap());
    }

    #[tokio::test]
    async fn test_role_change_visible_on_next_lookup() {
        let (repo, admin, _) = seeded();
        repo.set_user_role(admin.id, 2).unwrap();
        let reloaded = repo.find_user_by_id(admin.id).await.unwrap().unwrap();
        assert!(!reloaded.is_admin());
        assert!(repo.find_user_by_email("nobody@test.com").await.unwrap().is_none());
    }
}
