//! services/api/src/adapters/credentials.rs
//!
//! Credential-verification adapters implementing the `CredentialVerifier`
//! port. The comparison strategy is chosen at startup: a plain shared
//! secret by default, an argon2 hash when one is configured.

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use async_trait::async_trait;

use catalog_core::ports::{CredentialVerifier, PortError, PortResult};

/// Byte-for-byte comparison against one configured secret.
///
/// This is a placeholder gate, not a security boundary: the secret sits in
/// process memory and there is no lockout or rate limiting.
pub struct FixedSecretVerifier {
    secret: String,
}

impl FixedSecretVerifier {
    /// Creates a new `FixedSecretVerifier`.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl CredentialVerifier for FixedSecretVerifier {
    async fn verify(&self, credential: &str) -> PortResult<bool> {
        Ok(credential == self.secret)
    }
}

/// Verifies the credential against a PHC-format argon2 hash, so the plain
/// secret never has to live in configuration.
pub struct Argon2Verifier {
    hash: String,
}

impl Argon2Verifier {
    /// Creates a new `Argon2Verifier` from a PHC-format hash string.
    pub fn new(hash: String) -> Self {
        Self { hash }
    }
}

#[async_trait]
impl CredentialVerifier for Argon2Verifier {
    async fn verify(&self, credential: &str) -> PortResult<bool> {
        let parsed_hash = PasswordHash::new(&self.hash)
            .map_err(|e| PortError::Unexpected(format!("invalid password hash: {e}")))?;

        Ok(Argon2::default()
            .verify_password(credential.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    #[tokio::test]
    async fn fixed_secret_accepts_only_an_exact_match() {
        let verifier = FixedSecretVerifier::new("admin123".to_string());

        assert!(verifier.verify("admin123").await.unwrap());
        assert!(!verifier.verify("Admin123").await.unwrap());
        assert!(!verifier.verify("").await.unwrap());
    }

    #[tokio::test]
    async fn argon2_verifier_round_trips_a_hashed_secret() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"admin123", &salt)
            .unwrap()
            .to_string();
        let verifier = Argon2Verifier::new(hash);

        assert!(verifier.verify("admin123").await.unwrap());
        assert!(!verifier.verify("admin124").await.unwrap());
    }

    #[tokio::test]
    async fn argon2_verifier_rejects_a_malformed_hash() {
        let verifier = Argon2Verifier::new("not-a-phc-string".to_string());
        assert!(verifier.verify("admin123").await.is_err());
    }
}
