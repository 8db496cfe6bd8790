//! # Gerevs Auth
//!
//! This crate provides the authentication step of a SOCKS5 proxy server.
//! It is meant to be plugged into a session layer that already accepted the
//! connection and agreed on an authentication method with the client.
//!
//! ## Where Authentication Fits in SOCKS5
//!
//! 1. **Method negotiation**: The client lists the authentication methods it supports and the
//!    server picks one of them. This happens in the session layer, not in this crate.
//! 2. **Authentication**: The chosen method's sub-negotiation runs over the same stream.
//!    This is what an [`auth::Authenticator`] does.
//! 3. **Request**: After a successful authentication the session layer goes on to handle
//!    CONNECT, BIND or UDP ASSOCIATE. A failed authentication ends the connection.
//!
//! ## Provided Pieces
//!
//! - [`auth::NoAuthAuthenticator`]: replies `[0x05, 0x00]` and always succeeds.
//! - [`auth::UsernamePasswordAuthenticator`]: runs the RFC 1929 sub-negotiation and checks the
//!   credentials against a [`store::CredentialStore`].
//! - [`store::MemoryStore`]: a credential store that keeps a salted digest of every password in a
//!   map guarded by a single lock, so one store can be shared by every connection.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gerevs_auth::{
//!     auth::{Authenticator, UsernamePasswordAuthenticator},
//!     store::{CredentialStore, MemoryStore},
//! };
//! use tokio::net::TcpStream;
//!
//! async fn authenticate(mut client: TcpStream, store: Arc<MemoryStore>) -> gerevs_auth::Result<()> {
//!     let authenticator = UsernamePasswordAuthenticator::new(store);
//!     let (mut reader, mut writer) = client.split();
//!     let user = authenticator.authenticate(&mut reader, &mut writer).await?;
//!     println!("authenticated {:?}", user);
//!     Ok(())
//! }
//!
//! let store = Arc::new(MemoryStore::new("server secret"));
//! store.set(b"alice", b"secret").unwrap();
//! ```
//!
//! A full server is in `demos/user_authentication.rs`.

use std::io;

use store::StoreError;
use thiserror::Error;

pub mod auth;
pub mod protocol;
pub mod store;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Why one run of an authentication sub-negotiation failed.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Reading the request or writing the reply failed, including a stream
    /// that closed early. No reply can be assumed to have reached the client.
    #[error("Error in network operation")]
    IoError(#[from] io::Error),
    /// The client sent bytes that do not form a valid request.
    #[error("Malformed handshake")]
    Malformed(#[from] HandshakeError),
    /// The credential store rejected the client.
    #[error("Credentials rejected")]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::IoError(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AuthError::Malformed(_))
    }

    /// `true` for a missing user or a wrong password.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Store(StoreError::UserNotExist { .. } | StoreError::BadPassword { .. })
        )
    }

    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            AuthError::Store(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("Invalid UsernamePassword version {0:#04x}")]
    UnsupportedVersion(u8),
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Password cannot be empty")]
    EmptyPassword,
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn kind_predicates() {
        let io: AuthError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(io.is_transport());
        assert!(!io.is_credential_failure());
        assert!(io.store_error().is_none());

        let malformed: AuthError = HandshakeError::EmptyUsername.into();
        assert!(malformed.is_malformed());
        assert!(!malformed.is_transport());

        let missing: AuthError = StoreError::UserNotExist {
            username: b"bob".to_vec(),
        }
        .into();
        assert!(missing.is_credential_failure());
        assert!(matches!(
            missing.store_error(),
            Some(StoreError::UserNotExist { .. })
        ));
    }

    #[test]
    fn source_chain_keeps_the_reason() {
        let err: AuthError = StoreError::BadPassword {
            username: b"alice".to_vec(),
        }
        .into();
        let source = err.source().map(|source| source.to_string());
        assert_eq!(source.as_deref(), Some("user alice has bad password"));

        let err: AuthError = HandshakeError::UnsupportedVersion(5).into();
        let source = err.source().map(|source| source.to_string());
        assert_eq!(source.as_deref(), Some("Invalid UsernamePassword version 0x05"));
    }
}
