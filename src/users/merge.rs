use super::{dto::UserUpdateRequest, model::User};
use crate::auth::{claims::Principal, password::PasswordHasher, policy};
use crate::error::AppError;
use crate::merge::{apply_text, Merged};
use crate::validation::{is_valid_password, NAME_LEN};

/// Folds a partial user update into `existing`.
///
/// Names are skipped when out of bounds. A new password must be 8-72 bytes
/// or the whole update fails. Sending `isAdmin` always counts as a change,
/// once the admin-flag gate lets it through.
pub fn merge_user(
    mut existing: User,
    req: &UserUpdateRequest,
    principal: &Principal,
    hasher: &PasswordHasher,
) -> Result<Merged<User>, AppError> {
    let mut changed = false;

    changed |= apply_text(&mut existing.first_name, req.first_name.as_deref(), NAME_LEN);
    changed |= apply_text(&mut existing.last_name, req.last_name.as_deref(), NAME_LEN);

    if let Some(password) = req.password.as_deref() {
        if !hasher.verify(password, &existing.password_hash) {
            if !is_valid_password(password) {
                return Err(AppError::validation("password length not appropriate"));
            }
            existing.password_hash = hasher
                .rehash(password)
                .map_err(|e| AppError::credential("some issue with your password", e))?;
            changed = true;
        }
    }

    if let Some(is_admin) = req.is_admin {
        policy::authorize_admin_flag(principal, &existing.username)?;
        existing.is_admin = is_admin;
        changed = true;
    }

    Ok(Merged {
        value: existing,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordConfig;
    use time::OffsetDateTime;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn alice(hasher: &PasswordHasher) -> User {
        User {
            id: 1,
            username: "alice1".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            password_hash: hasher.hash("longenough1").unwrap(),
            is_admin: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn principal(username: &str, is_admin: bool) -> Principal {
        Principal {
            username: username.into(),
            is_admin,
            expires_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn empty_request_changes_nothing() {
        let h = hasher();
        let merged = merge_user(alice(&h), &UserUpdateRequest::default(), &principal("alice1", false), &h)
            .unwrap();
        assert!(!merged.changed);
        assert!(matches!(merged.into_changed(), Err(AppError::NoEffectiveChange)));
    }

    #[test]
    fn names_are_trimmed_and_applied() {
        let h = hasher();
        let req = UserUpdateRequest {
            first_name: Some("  Alicia ".into()),
            ..Default::default()
        };
        let merged = merge_user(alice(&h), &req, &principal("alice1", false), &h).unwrap();
        assert!(merged.changed);
        assert_eq!(merged.value.first_name, "Alicia");
        assert_eq!(merged.value.last_name, "Smith");
    }

    #[test]
    fn out_of_bounds_name_is_skipped_but_others_apply() {
        let h = hasher();
        let req = UserUpdateRequest {
            first_name: Some("Al".into()),
            last_name: Some("Smythe".into()),
            ..Default::default()
        };
        let merged = merge_user(alice(&h), &req, &principal("alice1", false), &h).unwrap();
        assert!(merged.changed);
        assert_eq!(merged.value.first_name, "Alice");
        assert_eq!(merged.value.last_name, "Smythe");
    }

    #[test]
    fn same_names_are_no_effective_change() {
        let h = hasher();
        let req = UserUpdateRequest {
            first_name: Some("Alice".into()),
            last_name: Some(" Smith".into()),
            password: Some("longenough1".into()),
            ..Default::default()
        };
        let merged = merge_user(alice(&h), &req, &principal("alice1", false), &h).unwrap();
        assert!(!merged.changed);
    }

    #[test]
    fn new_password_is_rehashed() {
        let h = hasher();
        let before = alice(&h);
        let req = UserUpdateRequest {
            password: Some("evenlonger22".into()),
            ..Default::default()
        };
        let merged = merge_user(before.clone(), &req, &principal("alice1", false), &h).unwrap();
        assert!(merged.changed);
        assert_ne!(merged.value.password_hash, before.password_hash);
        assert!(h.verify("evenlonger22", &merged.value.password_hash));
        assert!(!h.verify("longenough1", &merged.value.password_hash));
    }

    #[test]
    fn bad_password_length_is_a_hard_error() {
        let h = hasher();
        let too_long = "x".repeat(73);
        for pw in ["short", too_long.as_str()] {
            let req = UserUpdateRequest {
                first_name: Some("Alicia".into()),
                password: Some(pw.to_string()),
                ..Default::default()
            };
            let err = merge_user(alice(&h), &req, &principal("alice1", false), &h).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn admin_flag_by_non_admin_is_unauthorized() {
        let h = hasher();
        let req = UserUpdateRequest {
            is_admin: Some(true),
            ..Default::default()
        };
        let err = merge_user(alice(&h), &req, &principal("alice1", false), &h).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn admin_flag_always_marks_changed() {
        let h = hasher();
        let req = UserUpdateRequest {
            is_admin: Some(false),
            ..Default::default()
        };
        let merged = merge_user(alice(&h), &req, &principal("bobby1", true), &h).unwrap();
        assert!(merged.changed);
        assert!(!merged.value.is_admin);
    }

    #[test]
    fn admin_cannot_demote_self() {
        let h = hasher();
        let mut bob = alice(&h);
        bob.username = "bobby1".into();
        bob.is_admin = true;
        for flag in [false, true] {
            let req = UserUpdateRequest {
                is_admin: Some(flag),
                ..Default::default()
            };
            let err = merge_user(bob.clone(), &req, &principal("bobby1", true), &h).unwrap_err();
            assert!(matches!(err, AppError::ForbiddenSelfDemotion));
        }
    }
}
