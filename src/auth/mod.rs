pub mod backend;
pub mod jwt;
pub mod password;
pub mod session;

pub use backend::EmailBackend;
pub use password::PasswordHasher;
pub use session::SessionStore;
