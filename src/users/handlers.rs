use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};

use super::{dto::UserUpdateRequest, merge::merge_user, model::User, services::resolve_owner};
use crate::{
    auth::{extractors::AuthUser, policy, policy::Operation},
    error::AppError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(list_users))
        .route("/api/user/:username", get(get_user).patch(update_user))
}

#[instrument(skip(state, principal), fields(principal = %principal.username))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    policy::authorize_admin(&principal)?;
    let users = state.store.list_users().await.map_err(|e| {
        error!(error = %e, "list_users failed");
        AppError::from(e)
    })?;
    Ok(Json(users))
}

#[instrument(skip(state, principal), fields(principal = %principal.username))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = resolve_owner(state.store.as_ref(), &principal, &username, Operation::ReadUser).await?;
    Ok(Json(user))
}

#[instrument(skip(state, principal, payload), fields(principal = %principal.username))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(username): Path<String>,
    payload: Result<Json<UserUpdateRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let existing = resolve_owner(state.store.as_ref(), &principal, &username, Operation::UpdateUser)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::not_found("the user you are trying to modify does not exist")
            }
            other => other,
        })?;
    let Json(payload) = payload?;

    let user = merge_user(existing, &payload, &principal, &state.passwords)?.into_changed()?;

    state.store.update_user(&user).await.map_err(|e| {
        error!(error = %e, user_id = user.id, "update_user failed");
        AppError::from(e)
    })?;

    info!(user_id = user.id, username = %user.username, "user updated");
    Ok(Json(user))
}
