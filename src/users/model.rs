use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated signup, ready to be inserted. Id and timestamp are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn serialized_user_hides_id_and_hash() {
        let user = User {
            id: 7,
            username: "alice1".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            password_hash: "$argon2id$secret".into(),
            is_admin: false,
            created_at: datetime!(2024-05-01 10:00 UTC),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice1");
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00Z");
        assert!(json.get("id").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
