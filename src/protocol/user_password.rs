//! RFC 1929 username/password sub-negotiation messages.
//!
//! Request, client to server:
//!
//! ```text
//! +----+------+----------+------+----------+
//! |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
//! +----+------+----------+------+----------+
//! | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
//! +----+------+----------+------+----------+
//! ```
//!
//! Reply, server to client:
//!
//! ```text
//! +----+--------+
//! |VER | STATUS |
//! +----+--------+
//! | 1  |   1    |
//! +----+--------+
//! ```

use std::fmt;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use zeroize::Zeroizing;

use crate::HandshakeError;

use super::USER_PASSWORD_VERSION;

/// Status byte of the sub-negotiation reply. Any non-zero status is a failure
/// and the client must expect the connection to be closed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Success = 0x00,
    Failure = 0x01,
}

impl AuthStatus {
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// A parsed username/password request.
///
/// Both fields are opaque bytes, taken verbatim from the wire. The password
/// buffer is wiped when the request is dropped.
pub struct UserPasswordRequest {
    pub username: Vec<u8>,
    pub password: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for UserPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPasswordRequest")
            .field("username", &String::from_utf8_lossy(&self.username))
            .field("password", &"<redacted>")
            .finish()
    }
}

impl UserPasswordRequest {
    /// Reads one request from `reader`.
    ///
    /// A stream that ends early surfaces as [`crate::AuthError::IoError`] with
    /// [`std::io::ErrorKind::UnexpectedEof`]; a wrong version byte or an empty
    /// field surfaces as [`crate::AuthError::Malformed`].
    pub async fn read<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let version = reader.read_u8().await?;
        if version != USER_PASSWORD_VERSION {
            return Err(HandshakeError::UnsupportedVersion(version).into());
        }

        let username_len = reader.read_u8().await?;
        if username_len < 1 {
            return Err(HandshakeError::EmptyUsername.into());
        }
        let mut username = vec![0; username_len as usize];
        reader.read_exact(&mut username).await?;

        let password_len = reader.read_u8().await?;
        if password_len < 1 {
            return Err(HandshakeError::EmptyPassword.into());
        }
        let mut password = Zeroizing::new(vec![0; password_len as usize]);
        reader.read_exact(&mut password).await?;

        Ok(UserPasswordRequest { username, password })
    }

    /// Encodes the request the way a client sends it.
    ///
    /// Fields longer than 255 bytes cannot be represented; the caller is
    /// expected to have checked the lengths.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(3 + self.username.len() + self.password.len());
        bytes.push(USER_PASSWORD_VERSION);
        bytes.push(self.username.len() as u8);
        bytes.extend_from_slice(&self.username);
        bytes.push(self.password.len() as u8);
        bytes.extend_from_slice(&self.password);
        bytes
    }
}

/// Writes the 2 byte sub-negotiation reply and flushes it.
pub async fn write_status<W>(writer: &mut W, status: AuthStatus) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&[USER_PASSWORD_VERSION, status.to_u8()])
        .await?;
    writer.flush().await
}
