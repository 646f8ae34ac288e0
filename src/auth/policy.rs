//! Who may do what to which resource.
//!
//! Every decision is a pure function of the authenticated principal, the
//! username of the resource's confirmed owner and the operation. Callers
//! must resolve the owner through the store first: a path segment is only a
//! claim, not an identity.

use tracing::warn;

use super::claims::Principal;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The owner, or any admin.
    ReadOwnOrAdmin,
    /// The owner only. Admins get no override here.
    WriteStrictOwn,
    /// Admins only, whoever the target is.
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    ReadUser,
    UpdateUser,
    ListTodos,
    ReadTodo,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
}

impl Operation {
    pub fn rule(self) -> Rule {
        match self {
            Operation::ListUsers => Rule::AdminOnly,
            Operation::ReadUser
            | Operation::UpdateUser
            | Operation::ListTodos
            | Operation::ReadTodo
            | Operation::DeleteTodo => Rule::ReadOwnOrAdmin,
            Operation::CreateTodo | Operation::UpdateTodo => Rule::WriteStrictOwn,
        }
    }
}

pub fn allows(principal: &Principal, owner: &str, rule: Rule) -> bool {
    let is_owner = principal.username == owner;
    match rule {
        Rule::ReadOwnOrAdmin => is_owner || principal.is_admin,
        Rule::WriteStrictOwn => is_owner,
        Rule::AdminOnly => principal.is_admin,
    }
}

pub fn authorize(principal: &Principal, owner: &str, op: Operation) -> Result<(), AppError> {
    if allows(principal, owner, op.rule()) {
        return Ok(());
    }
    warn!(principal = %principal.username, owner, ?op, "permission denied");
    Err(match op {
        Operation::ListUsers => AppError::unauthorized("you are not admin"),
        _ => AppError::unauthorized("you don't have permission"),
    })
}

/// Admin-only listing has no owner to compare against.
pub fn authorize_admin(principal: &Principal) -> Result<(), AppError> {
    authorize(principal, "", Operation::ListUsers)
}

/// Gate for touching a user's admin flag. Only admins may do it, and never
/// on their own record, whatever the new value and however many other
/// admins exist.
pub fn authorize_admin_flag(principal: &Principal, target: &str) -> Result<(), AppError> {
    if !principal.is_admin {
        warn!(principal = %principal.username, target, "non-admin tried to change admin flag");
        return Err(AppError::unauthorized("you are unauthorized for this method"));
    }
    if principal.username == target {
        warn!(principal = %principal.username, "admin tried to change own admin flag");
        return Err(AppError::ForbiddenSelfDemotion);
    }
    Ok(())
}
