pub mod slot;
pub mod swap;
pub mod user;
