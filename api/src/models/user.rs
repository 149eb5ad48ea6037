use crate::config::PasswordStorage;
use bcrypt::{BcryptError, DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: Credential,
    pub created_at: DateTime<Utc>,
}

/// A stored password.
///
/// `Plaintext` keeps the submitted password verbatim and compares it
/// byte-for-byte. `Bcrypt` keeps a salted hash; login still succeeds only
/// for the exact password that was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Plaintext(String),
    Bcrypt(String),
}

impl Credential {
    pub fn seal(storage: PasswordStorage, password: &str) -> Result<Self, BcryptError> {
        match storage {
            PasswordStorage::Plaintext => Ok(Credential::Plaintext(password.to_owned())),
            PasswordStorage::Bcrypt => hash(password, DEFAULT_COST).map(Credential::Bcrypt),
        }
    }

    pub fn matches(&self, candidate: &str) -> Result<bool, BcryptError> {
        match self {
            Credential::Plaintext(stored) => Ok(stored == candidate),
            Credential::Bcrypt(hashed) => verify(candidate, hashed),
        }
    }
}
