use std::fmt;

use super::role::RoleName;

/// A row of the vacation site's `users` table joined with its role.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleName,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == RoleName::Admin
    }

    /// Inactive accounts are refused by the authentication backend.
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }
}

// The password hash stays out of debug output.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .finish_non_exhaustive()
    }
}
