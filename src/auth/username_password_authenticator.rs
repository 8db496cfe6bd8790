//! # User Authentication Module
//!
//! This module provides the `UsernamePasswordAuthenticator`, which runs the RFC 1929
//! username/password sub-negotiation and checks the received pair against a
//! [`CredentialStore`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gerevs_auth::{
//!     auth::UsernamePasswordAuthenticator,
//!     store::{CredentialStore, MemoryStore},
//! };
//!
//! let store = Arc::new(MemoryStore::new("server secret"));
//! store.set(b"admin", b"password").unwrap();
//!
//! // Every connection gets its own authenticator, all of them share the store.
//! let auth = UsernamePasswordAuthenticator::new(Arc::clone(&store));
//! ```

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use crate::{
    protocol::{write_status, AuthMethod, AuthStatus, UserPasswordRequest},
    store::CredentialStore,
    AuthError,
};

use super::Authenticator;

/// The user a connection authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Vec<u8>,
}

/// The `UsernamePasswordAuthenticator` struct handles the username and password authentication process
/// in the SOCKS5 protocol.
#[derive(Debug, Clone)]
pub struct UsernamePasswordAuthenticator<S> {
    store: S,
}

impl<S> Authenticator for UsernamePasswordAuthenticator<S>
where
    S: CredentialStore + Send + Sync,
{
    type Credentials = User;

    fn method(&self) -> AuthMethod {
        AuthMethod::UsernamePassword
    }

    /// Reads one request, validates it against the store and replies `[0x01, 0x00]` on success or
    /// `[0x01, 0x01]` on failure.
    ///
    /// A malformed request is answered with a failure reply as well. A stream that closes before
    /// the request is complete gets no reply.
    async fn authenticate<R, W>(&self, reader: &mut R, writer: &mut W) -> crate::Result<User>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let request = match UserPasswordRequest::read(reader).await {
            Ok(request) => request,
            Err(AuthError::Malformed(err)) => {
                debug!("Malformed username/password request: {}", err);
                self.send_failure(writer).await;
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        let username = String::from_utf8_lossy(&request.username).into_owned();
        debug!("Received username: {:?}", username);

        if let Err(err) = self.store.validate(&request.username, &request.password) {
            debug!("Rejected {:?}: {}", username, err);
            self.send_failure(writer).await;
            return Err(err.into());
        }

        write_status(writer, AuthStatus::Success).await?;
        debug!("Authenticated {:?}", username);

        Ok(User {
            username: request.username,
        })
    }
}

impl<S> UsernamePasswordAuthenticator<S>
where
    S: CredentialStore,
{
    /// Creates a new `UsernamePasswordAuthenticator` that validates against `store`.
    ///
    /// Pass an `Arc` (or a reference) to share one store between connections.
    pub fn new(store: S) -> UsernamePasswordAuthenticator<S> {
        UsernamePasswordAuthenticator { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The failure is what gets returned, a reply that can't be delivered is only logged.
    async fn send_failure<W>(&self, writer: &mut W)
    where
        W: AsyncWrite + Unpin,
    {
        if let Err(err) = write_status(writer, AuthStatus::Failure).await {
            warn!("Failed to send authentication failure: {}", err);
        }
    }
}
