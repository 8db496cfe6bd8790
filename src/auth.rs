use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::protocol::AuthMethod;

pub mod no_auth_authenticator;
pub mod username_password_authenticator;

pub use no_auth_authenticator::NoAuthAuthenticator;
pub use username_password_authenticator::{User, UsernamePasswordAuthenticator};

/// One authentication method's sub-negotiation.
///
/// The session layer picks an `Authenticator` by the method agreed on with the client and calls
/// [`Authenticator::authenticate`] once per connection. Any error ends that connection; retrying
/// is up to the session layer.
pub trait Authenticator {
    /// What a successful authentication yields to the session layer.
    type Credentials;

    /// The method id this authenticator implements.
    fn method(&self) -> AuthMethod;

    /// Selects [`Authenticator::method`] if the client offered it, `NoAcceptableMethods` otherwise.
    fn select_method(&self, methods: &[AuthMethod]) -> AuthMethod {
        let method = self.method();
        if methods.contains(&method) {
            method
        } else {
            AuthMethod::NoAcceptableMethods
        }
    }

    /// Authenticator Should:
    /// read exactly the bytes its sub-negotiation needs from `reader`,
    /// write its reply to `writer` once, unless the transport failed first,
    /// return the credentials on success
    /// return the reason on failure
    fn authenticate<R, W>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> impl Future<Output = crate::Result<Self::Credentials>> + Send
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send;
}
