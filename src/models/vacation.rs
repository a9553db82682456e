use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

pub const MAX_PRICE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vacation {
    pub id: i64,
    pub country_id: i64,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub image_file: String,
}

/// Where a vacation sits relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacationPhase {
    Past,
    Ongoing,
    Future,
}

impl Vacation {
    pub fn phase(&self, today: NaiveDate) -> VacationPhase {
        if self.end_date < today {
            VacationPhase::Past
        } else if self.start_date > today {
            VacationPhase::Future
        } else {
            VacationPhase::Ongoing
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewVacation {
    pub country_id: i64,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub image_file: String,
}

impl NewVacation {
    pub fn validate(&self) -> AppResult<()> {
        if self.end_date <= self.start_date {
            return Err(AppError::validation("End date must be after start date"));
        }
        if !(0.0..=MAX_PRICE).contains(&self.price) {
            return Err(AppError::validation("Price must be between 0 and 10000"));
        }
        Ok(())
    }

    pub fn into_vacation(self, id: i64) -> AppResult<Vacation> {
        self.validate()?;
        Ok(Vacation {
            id,
            country_id: self.country_id,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            price: self.price,
            image_file: self.image_file,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub vacation_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn new_vacation(start: i64, end: i64, price: f64) -> NewVacation {
        NewVacation {
            country_id: 1,
            description: "Rome".into(),
            start_date: today() + Duration::days(start),
            end_date: today() + Duration::days(end),
            price,
            image_file: "rome.jpg".into(),
        }
    }

    #[rstest]
    #[case(-20, -10, VacationPhase::Past)]
    #[case(-5, 5, VacationPhase::Ongoing)]
    #[case(0, 3, VacationPhase::Ongoing)]
    #[case(-3, 0, VacationPhase::Ongoing)]
    #[case(-2, -1, VacationPhase::Past)]
    #[case(1, 2, VacationPhase::Future)]
    #[case(10, 20, VacationPhase::Future)]
    fn test_phase_relative_to_today(#[case] start: i64, #[case] end: i64, #[case] expected: VacationPhase) {
        let vacation = new_vacation(start, end, 100.0).into_vacation(1).unwrap();
        assert_eq!(vacation.phase(today()), expected);
    }

    #[rstest]
    #[case(5, 5)]
    #[case(5, 1)]
    fn test_end_must_follow_start(#[case] start: i64, #[case] end: i64) {
        let err = new_vacation(start, end, 100.0).validate().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "End date must be after start date"));
    }

    #[rstest]
    #[case(-0.01)]
    #[case(10_000.01)]
    fn test_price_out_of_range(#[case] price: f64) {
        assert!(new_vacation(1, 2, price).validate().is_err());
    }

    #[test]
    fn test_price_bounds_inclusive() {
        assert!(new_vacation(1, 2, 0.0).validate().is_ok());
        assert!(new_vacation(1, 2, MAX_PRICE).validate().is_ok());
    }
}
