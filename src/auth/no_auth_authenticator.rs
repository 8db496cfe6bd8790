use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::protocol::{AuthMethod, VERSION};

use super::Authenticator;

/// The `NoAuthAuthenticator` struct is an implementation of the `Authenticator` trait that handles
/// the "no authentication" method in the SOCKS5 protocol. It requires no credentials from the client
/// and reads nothing from the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

impl Authenticator for NoAuthAuthenticator {
    /// No credentials are produced.
    type Credentials = ();

    fn method(&self) -> AuthMethod {
        AuthMethod::NoAuthRequired
    }

    /// Writes `[VERSION, NoAuthRequired]` and succeeds.
    async fn authenticate<R, W>(&self, _: &mut R, writer: &mut W) -> crate::Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let reply = [VERSION, AuthMethod::NoAuthRequired.to_u8()];
        writer.write_all(&reply).await?;
        writer.flush().await?;
        trace!("Sent no authentication reply: {:?}", reply);
        Ok(())
    }
}
