use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // username
    pub admin: bool,  // admin flag at issue time
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}

/// Identity attached to a request after its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub is_admin: bool,
    pub expires_at: OffsetDateTime,
}

impl TryFrom<Claims> for Principal {
    type Error = time::error::ComponentRange;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            username: claims.sub,
            is_admin: claims.admin,
            expires_at: OffsetDateTime::from_unix_timestamp(claims.exp as i64)?,
        })
    }
}
