use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::password::CredentialError;
use crate::store::StoreError;

/// Terminal outcome of a failed request. The `Display` text is what the
/// client sees; sources are only ever logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("you cannot change your own admin status")]
    ForbiddenSelfDemotion,

    #[error("{message}")]
    Credential {
        message: String,
        #[source]
        source: CredentialError,
    },

    #[error("no field in the request changes the record")]
    NoEffectiveChange,

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Store(#[source] StoreError),

    #[error("could not issue token")]
    Token(#[source] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn credential(msg: impl Into<String>, source: CredentialError) -> Self {
        AppError::Credential {
            message: msg.into(),
            source,
        }
    }

    /// Maps a gateway failure, naming the missing resource for `NotFound`.
    pub fn from_store(err: StoreError, missing: &str) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(missing.to_string()),
            other => other.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenSelfDemotion => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NoEffectiveChange => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Credential { .. } | AppError::Store(_) | AppError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::ForbiddenSelfDemotion => "FORBIDDEN_SELF_DEMOTION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NoEffectiveChange => "NO_EFFECTIVE_CHANGE",
            AppError::Credential { .. } => "CREDENTIAL_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Token(_) => "TOKEN_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("record not found".into()),
            StoreError::Conflict(_) => AppError::Conflict("this username is already taken".into()),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "error binding request body");
        AppError::Validation("error binding request body".into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection.body_text(), "invalid path parameter");
        AppError::Validation("invalid path parameter".into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(source) => {
                error!(error = %source, "store operation failed");
            }
            AppError::Credential { source, .. } => {
                error!(error = %source, "credential operation failed");
            }
            AppError::Token(source) => {
                error!(error = %source, "token signing failed");
            }
            _ => {}
        }
        let status = self.status_code();
        let body = json!({
            "message": self.to_string(),
            "code": self.code(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_keeps_resource_message() {
        let err = AppError::from_store(StoreError::NotFound, "this todo does not exist");
        assert!(matches!(err, AppError::NotFound(ref m) if m == "this todo does not exist"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_hides_constraint_name() {
        let err: AppError = StoreError::Conflict("users_username_key".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.to_string().contains("users_username_key"));
    }

    #[test]
    fn every_kind_has_its_own_code() {
        let errs = [
            AppError::validation("x"),
            AppError::not_found("x"),
            AppError::unauthorized("x"),
            AppError::ForbiddenSelfDemotion,
            AppError::credential("x", CredentialError::TooLong { len: 80 }),
            AppError::NoEffectiveChange,
            AppError::Conflict("x".into()),
            AppError::Store(StoreError::Database(sqlx::Error::PoolClosed)),
            AppError::Token(anyhow::anyhow!("boom")),
        ];
        let mut codes: Vec<_> = errs.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn store_message_is_generic() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.to_string(), "internal server error");
    }
}
