pub mod access;
pub mod admin;
pub mod files;
pub mod health;
