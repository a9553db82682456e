use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    User,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::User => "user",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleName::Admin),
            "user" => Ok(RoleName::User),
            other => Err(AppError::validation(format!("Unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub role_name: RoleName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("admin".parse::<RoleName>().unwrap(), RoleName::Admin);
        assert_eq!("user".parse::<RoleName>().unwrap(), RoleName::User);
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        assert!("Admin".parse::<RoleName>().is_err());
        assert!("superuser".parse::<RoleName>().is_err());
    }
}
