pub mod role;
pub mod user;
pub mod vacation;

pub use role::{Role, RoleName};
pub use user::User;
pub use vacation::{Country, Like, NewVacation, Vacation, VacationPhase};
