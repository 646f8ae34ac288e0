mod dto;
pub mod handlers;
pub mod merge;
pub mod model;

use crate::state::AppState;
use axum::Router;

pub use dto::{TodoAddRequest, TodoUpdateRequest};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::todo_routes())
}
