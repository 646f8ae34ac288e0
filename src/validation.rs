use std::ops::RangeInclusive;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;

use crate::error::AppError;

pub const USERNAME_LEN: RangeInclusive<usize> = 5..=20;
pub const NAME_LEN: RangeInclusive<usize> = 4..=50;
/// Bytes, matching the hasher's limit.
pub const PASSWORD_LEN: RangeInclusive<usize> = 8..=72;
pub const TITLE_LEN: RangeInclusive<usize> = 4..=50;
pub const DESCRIPTION_LEN: RangeInclusive<usize> = 0..=320;

lazy_static! {
    static ref ALPHANUM_RE: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
    static ref ALPHA_RE: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
}

pub fn char_len_within(value: &str, bounds: &RangeInclusive<usize>) -> bool {
    bounds.contains(&value.chars().count())
}

pub fn is_valid_username(username: &str) -> bool {
    char_len_within(username, &USERNAME_LEN) && ALPHANUM_RE.is_match(username)
}

pub fn is_valid_name(name: &str) -> bool {
    char_len_within(name, &NAME_LEN) && ALPHA_RE.is_match(name)
}

pub fn is_valid_password(password: &str) -> bool {
    PASSWORD_LEN.contains(&password.len())
}

pub fn is_stale(date: OffsetDateTime, now: OffsetDateTime) -> bool {
    date < now
}

/// Create-time field check: out of bounds rejects the whole request.
pub fn require(ok: bool, field: &str) -> Result<(), AppError> {
    if ok {
        Ok(())
    } else {
        Err(AppError::validation(format!("invalid request body: {field}")))
    }
}
