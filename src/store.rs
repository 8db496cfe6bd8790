//! # Credential Stores
//!
//! A [`CredentialStore`] owns the (username, password) pairs that the
//! [`UsernamePasswordAuthenticator`](crate::auth::UsernamePasswordAuthenticator) checks clients
//! against. Stores are shared by every connection, so all operations take `&self` and
//! implementations do their own locking.

use std::sync::Arc;

use thiserror::Error;

pub mod memory_store;

pub use memory_store::MemoryStore;

/// Usernames and passwords must fit the one byte length fields of the sub-negotiation.
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {} doesn't exist", String::from_utf8_lossy(.username))]
    UserNotExist { username: Vec<u8> },
    #[error("user {} has bad password", String::from_utf8_lossy(.username))]
    BadPassword { username: Vec<u8> },
    /// Rejected by [`CredentialStore::set`]: a client could never send this value.
    #[error("{field} must be 1 to 255 bytes long, got {len}")]
    InvalidLength { field: &'static str, len: usize },
}

/// The `CredentialStore` trait is the set / delete / validate surface of a username and
/// password database.
pub trait CredentialStore {
    /// Stores `password` for `username`, replacing any previous password.
    /// Setting the same pair twice leaves the store unchanged.
    fn set(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError>;

    /// Removes `username`.
    ///
    /// - Returns [`StoreError::UserNotExist`] if there is no such user.
    fn delete(&self, username: &[u8]) -> Result<(), StoreError>;

    /// Checks `password` against the one stored for `username`.
    ///
    /// - Returns [`StoreError::UserNotExist`] if there is no such user.
    /// - Returns [`StoreError::BadPassword`] if the password does not match.
    fn validate(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn set(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        (**self).set(username, password)
    }

    fn delete(&self, username: &[u8]) -> Result<(), StoreError> {
        (**self).delete(username)
    }

    fn validate(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        (**self).validate(username, password)
    }
}

impl<S> CredentialStore for &S
where
    S: CredentialStore + ?Sized,
{
    fn set(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        (**self).set(username, password)
    }

    fn delete(&self, username: &[u8]) -> Result<(), StoreError> {
        (**self).delete(username)
    }

    fn validate(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        (**self).validate(username, password)
    }
}

pub(crate) fn check_len(field: &'static str, value: &[u8]) -> Result<(), StoreError> {
    if value.is_empty() || value.len() > MAX_FIELD_LEN {
        return Err(StoreError::InvalidLength {
            field,
            len: value.len(),
        });
    }
    Ok(())
}
