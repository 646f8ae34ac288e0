use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{HealthReport, Store, StoreError};
use crate::todos::model::{NewTodo, Todo};
use crate::users::model::{NewUser, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

/// In-process gateway with the same constraints as the Postgres schema:
/// unique usernames, todos scoped by owner.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".into()));
        }
        tables.next_user_id += 1;
        let row = User {
            id: tables.next_user_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: user.is_admin,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StoreError::NotFound)?;
        // username and created_at are never rewritten
        row.first_name = user.first_name.clone();
        row.last_name = user.last_name.clone();
        row.password_hash = user.password_hash.clone();
        row.is_admin = user.is_admin;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn get_todo(&self, id: i64, owner_id: i64) -> Result<Todo, StoreError> {
        let tables = self.tables.read().await;
        tables
            .todos
            .iter()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_todos(&self, owner_id: i64) -> Result<Vec<Todo>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == todo.owner_id) {
            return Err(StoreError::NotFound);
        }
        tables.next_todo_id += 1;
        let row = Todo {
            id: tables.next_todo_id,
            owner_id: todo.owner_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status,
            due_date: todo.due_date,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.todos.push(row.clone());
        Ok(row)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id && t.owner_id == todo.owner_id)
            .ok_or(StoreError::NotFound)?;
        row.title = todo.title.clone();
        row.description = todo.description.clone();
        row.status = todo.status;
        row.due_date = todo.due_date;
        Ok(())
    }

    async fn delete_todo(&self, id: i64, owner_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables
            .todos
            .retain(|t| !(t.id == id && t.owner_id == owner_id));
        if tables.todos.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health(&self) -> HealthReport {
        HealthReport {
            status: "up",
            message: "It's Healthy".into(),
            open_connections: 0,
            idle: 0,
        }
    }

    async fn close(&self) {}
}
