//! Registration and login
//!
//! Passwords are stored as Argon2 PHC strings, each with its own random
//! 16-byte salt.

use crate::error::{GateError, Result};
use crate::store::{UserRecord, UserStore};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use tracing::{debug, info};

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Hash `password` into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt).map_err(|e| GateError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GateError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| GateError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Registers and authenticates users against a [`UserStore`]
pub struct Authenticator<S: UserStore> {
    store: S,
}

impl<S: UserStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register `username` after checking the confirmation matches
    pub fn register(&mut self, username: &str, password: &str, confirm: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GateError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(GateError::EmptyPassword);
        }
        if password != confirm {
            return Err(GateError::PasswordMismatch);
        }
        if self.store.find(username)?.is_some() {
            return Err(GateError::UsernameTaken(username.to_string()));
        }

        let record = UserRecord {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        self.store.create(record)?;

        info!("Registered user '{}'", username);
        Ok(())
    }

    /// Authenticate and return the normalized username
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let username = username.trim();
        let Some(record) = self.store.find(username)? else {
            debug!("Login for unknown user '{}'", username);
            return Err(GateError::InvalidCredentials);
        };

        if !verify_password(password, &record.password_hash)? {
            debug!("Wrong password for '{}'", username);
            return Err(GateError::InvalidCredentials);
        }

        info!("User '{}' logged in", username);
        Ok(record.username)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory store for tests
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        users: HashMap<String, UserRecord>,
    }

    impl UserStore for MemoryStore {
        fn find(&self, username: &str) -> Result<Option<UserRecord>> {
            Ok(self.users.get(username).cloned())
        }

        fn create(&mut self, record: UserRecord) -> Result<()> {
            if self.users.contains_key(&record.username) {
                return Err(GateError::UsernameTaken(record.username));
            }
            self.users.insert(record.username.clone(), record);
            Ok(())
        }
    }

    #[test]
    fn test_hash_is_phc_and_salted() {
        let first = hash_password("s3cret").unwrap();
        let second = hash_password("s3cret").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("s3cret", &first).unwrap());
        assert!(verify_password("s3cret", &second).unwrap());
        assert!(!verify_password("S3cret", &first).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let err = verify_password("s3cret", "plaintext").unwrap_err();
        assert!(matches!(err, GateError::Hash(_)));
    }

    #[test]
    fn test_register_then_login() {
        let mut auth = Authenticator::new(MemoryStore::default());
        auth.register("alice", "pw", "pw").unwrap();
        assert_eq!(auth.login("alice", "pw").unwrap(), "alice");
        assert_eq!(auth.login("  alice ", "pw").unwrap(), "alice");
    }

    #[test]
    fn test_register_validation() {
        let mut auth = Authenticator::new(MemoryStore::default());
        assert!(matches!(
            auth.register("  ", "pw", "pw"),
            Err(GateError::EmptyUsername)
        ));
        assert!(matches!(
            auth.register("alice", "", ""),
            Err(GateError::EmptyPassword)
        ));
        assert!(matches!(
            auth.register("alice", "pw", "wp"),
            Err(GateError::PasswordMismatch)
        ));

        auth.register("alice", "pw", "pw").unwrap();
        assert!(matches!(
            auth.register("alice", "other", "other"),
            Err(GateError::UsernameTaken(_))
        ));
    }

    #[test]
    fn test_login_failures_look_the_same() {
        let mut auth = Authenticator::new(MemoryStore::default());
        auth.register("alice", "pw", "pw").unwrap();

        let unknown = auth.login("bob", "pw").unwrap_err();
        let wrong = auth.login("alice", "nope").unwrap_err();
        assert!(matches!(unknown, GateError::InvalidCredentials));
        assert!(matches!(wrong, GateError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
