pub mod auth;
pub mod id;
pub mod slot;
pub mod swap;
pub mod user;
