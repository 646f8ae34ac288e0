use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

use crate::config::PasswordConfig;

/// Longest accepted password, in bytes. Anything longer is refused rather
/// than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password is {len} bytes, the limit is {MAX_PASSWORD_BYTES}")]
    TooLong { len: usize },
    #[error("argon2: {0}")]
    Hash(String),
}

/// Salted Argon2id hashing with a fixed work factor.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialError::TooLong { len: plain.len() });
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                CredentialError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Constant-time check. A malformed stored hash simply fails to match.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    /// Hash for a changed password; no history is kept.
    pub fn rehash(&self, plain: &str) -> Result<String, CredentialError> {
        self.hash(plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("params are valid")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert!(hasher.verify(password, &hash));
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let hasher = hasher();
        let a = hasher.hash("longenough1").unwrap();
        let b = hasher.rehash("longenough1").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("longenough1", &a));
        assert!(hasher.verify("longenough1", &b));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash));
    }

    #[test]
    fn verify_is_false_on_malformed_hash() {
        assert!(!hasher().verify("anything", "not-a-valid-hash"));
        assert!(!hasher().verify("anything", ""));
    }

    #[test]
    fn overlong_password_is_refused() {
        let hasher = hasher();
        assert!(hasher.hash(&"a".repeat(MAX_PASSWORD_BYTES)).is_ok());
        let err = hasher.hash(&"a".repeat(MAX_PASSWORD_BYTES + 1)).unwrap_err();
        assert!(matches!(err, CredentialError::TooLong { len: 73 }));
        // 24 three-byte characters already hit the byte limit
        assert!(hasher.hash(&"€".repeat(25)).is_err());
    }

    #[test]
    fn hashes_from_other_work_factors_still_verify() {
        let strong = PasswordHasher::new(&PasswordConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = strong.hash("longenough1").unwrap();
        assert!(hasher().verify("longenough1", &hash));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let res = PasswordHasher::new(&PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(res.is_err());
    }
}
