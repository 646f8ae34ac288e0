use serde::Deserialize;

/// Body of `PATCH /api/user/:username`. Every field is optional; only the
/// ones that are sent are considered.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}
