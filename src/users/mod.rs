mod dto;
pub mod handlers;
pub mod merge;
pub mod model;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::UserUpdateRequest;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
