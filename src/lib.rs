pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod merge;
pub mod state;
pub mod store;
pub mod todos;
pub mod users;
pub mod validation;
