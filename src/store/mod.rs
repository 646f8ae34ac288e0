//! Persistence gateway. Handlers only ever see `dyn Store`; the concrete
//! gateway is built once at startup and injected through `AppState`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::todos::model::{NewTodo, Todo};
use crate::users::model::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub message: String,
    pub open_connections: u32,
    pub idle: usize,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;
    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_todo(&self, id: i64, owner_id: i64) -> Result<Todo, StoreError>;
    async fn list_todos(&self, owner_id: i64) -> Result<Vec<Todo>, StoreError>;
    async fn insert_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError>;
    async fn update_todo(&self, todo: &Todo) -> Result<(), StoreError>;
    async fn delete_todo(&self, id: i64, owner_id: i64) -> Result<(), StoreError>;

    async fn health(&self) -> HealthReport;
    async fn close(&self);
}
