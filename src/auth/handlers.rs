use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, SignInRequest, SignUpRequest},
        jwt::JwtKeys,
    },
    error::AppError,
    state::AppState,
    store::StoreError,
    users::model::{NewUser, User},
    validation::{is_valid_name, is_valid_password, is_valid_username, require},
};

/// Response header that also carries the freshly issued token.
pub const TOKEN_HEADER: &str = "x-token-auth";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();
    payload.first_name = payload.first_name.trim().to_string();
    payload.last_name = payload.last_name.trim().to_string();

    require(is_valid_username(&payload.username), "username")?;
    require(is_valid_password(&payload.password), "password")?;
    require(is_valid_name(&payload.first_name), "firstName")?;
    require(is_valid_name(&payload.last_name), "lastName")?;

    let password_hash = state.passwords.hash(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::credential("there is an issue with your password", e)
    })?;

    let new_user = NewUser {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
        is_admin: false,
    };

    let user = match state.store.insert_user(&new_user).await {
        Ok(u) => u,
        Err(StoreError::Conflict(constraint)) => {
            warn!(username = %new_user.username, %constraint, "username already registered");
            return Err(AppError::Conflict("this username is already taken".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();
    require(!payload.username.is_empty(), "username")?;
    require(!payload.password.is_empty(), "password")?;

    let user = match state.store.get_user_by_username(&payload.username).await {
        Ok(u) => u,
        Err(StoreError::NotFound) => {
            warn!(username = %payload.username, "signin unknown username");
            return Err(AppError::unauthorized("incorrect credentials"));
        }
        Err(e) => {
            error!(error = %e, "get_user_by_username failed");
            return Err(e.into());
        }
    };

    if !state.passwords.verify(&payload.password, &user.password_hash) {
        warn!(username = %user.username, user_id = user.id, "signin invalid password");
        return Err(AppError::unauthorized("incorrect credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .issue(&user.username, user.is_admin)
        .map_err(AppError::Token)?;

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&token) {
        headers.insert(HeaderName::from_static(TOKEN_HEADER), value);
    }

    info!(user_id = user.id, username = %user.username, "user signed in");
    Ok((StatusCode::CREATED, headers, Json(AuthResponse { user, token })))
}
