use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Progress of a todo, stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(into = "i16")]
#[repr(i16)]
pub enum TodoStatus {
    Open = 0,
    InProgress = 1,
    Done = 2,
}

impl From<TodoStatus> for i16 {
    fn from(status: TodoStatus) -> Self {
        status as i16
    }
}

impl TryFrom<i16> for TodoStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TodoStatus::Open),
            1 => Ok(TodoStatus::InProgress),
            2 => Ok(TodoStatus::Done),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Todo {
    #[serde(rename = "todo_id")]
    pub id: i64,
    #[serde(skip_serializing)]
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    #[serde(rename = "dueDate", with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_date: OffsetDateTime,
}
