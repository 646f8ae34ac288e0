use tracing::instrument;

use super::model::User;
use crate::auth::{
    claims::Principal,
    policy::{self, Operation},
};
use crate::error::AppError;
use crate::store::Store;

/// Looks up the user named in the path and checks `op` against them.
/// The lookup comes first, so an unknown username is `NotFound` for anyone.
#[instrument(skip(store, principal), fields(principal = %principal.username))]
pub async fn resolve_owner(
    store: &dyn Store,
    principal: &Principal,
    username: &str,
    op: Operation,
) -> Result<User, AppError> {
    let owner = store
        .get_user_by_username(username)
        .await
        .map_err(|e| AppError::from_store(e, "this user does not exist"))?;
    policy::authorize(principal, &owner.username, op)?;
    Ok(owner)
}
