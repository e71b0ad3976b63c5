//! Credential gate error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while registering or authenticating users
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Username must not be empty.")]
    EmptyUsername,

    #[error("Password must not be empty.")]
    EmptyPassword,

    #[error("Passwords do not match. Registration failed.")]
    PasswordMismatch,

    #[error("Username '{0}' already exists. Choose another one.")]
    UsernameTaken(String),

    /// Returned for an unknown user and for a wrong password alike
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("User store {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("User store {} is unavailable: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GateError {
    /// Errors caused by what the user typed, as opposed to the store or the host
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GateError::EmptyUsername
                | GateError::EmptyPassword
                | GateError::PasswordMismatch
                | GateError::UsernameTaken(_)
                | GateError::InvalidCredentials
        )
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
