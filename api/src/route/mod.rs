pub mod auth;
pub mod health;
pub mod slot;
pub mod swap;
