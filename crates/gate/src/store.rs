//! User record storage
//!
//! Records live in a TOML file as an array of `[[users]]` tables:
//!
//! ```toml
//! [[users]]
//! username = "alice"
//! password_hash = "$argon2id$v=19$m=19456,t=2,p=1$..."
//! ```

use crate::config::StoreConfig;
use crate::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// PHC-formatted password hash
    pub password_hash: String,
}

/// Lookup and creation of user records
pub trait UserStore {
    /// Find the record of `username`
    fn find(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Add a new record; the username must not exist yet
    fn create(&mut self, record: UserRecord) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// User records kept in a TOML file
#[derive(Debug, Clone)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::at(config.resolved_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records; a missing file is an empty store
    fn read(&self) -> Result<StoreFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(source) => {
                return Err(GateError::StoreIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|e| GateError::CorruptStore {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write(&self, file: &StoreFile) -> Result<()> {
        let content = toml::to_string_pretty(file).map_err(|e| GateError::CorruptStore {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let io_err = |source| GateError::StoreIo {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl UserStore for FileUserStore {
    fn find(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .read()?
            .users
            .into_iter()
            .find(|user| user.username == username))
    }

    fn create(&mut self, record: UserRecord) -> Result<()> {
        let mut file = self.read()?;
        if file.users.iter().any(|user| user.username == record.username) {
            return Err(GateError::UsernameTaken(record.username));
        }

        debug!("Adding user '{}' to {}", record.username, self.path.display());
        file.users.push(record);
        self.write(&file)
    }
}
