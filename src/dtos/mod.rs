pub mod auth;
pub mod stats;
