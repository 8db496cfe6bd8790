//! Accepts SOCKS5 clients, negotiates the username/password method and authenticates them
//! against an in-memory store. Requests after authentication are not served.
//!
//! ```text
//! GEREVS_AUTH_USER=alice GEREVS_AUTH_PASSWORD=secret RUST_LOG=debug \
//!     cargo run --example user_authentication
//! ```

use gerevs_auth::{
    auth::{Authenticator, UsernamePasswordAuthenticator},
    protocol::{AuthMethod, VERSION},
    store::{CredentialStore, MemoryStore},
};
use std::{env, error::Error, io, sync::Arc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, info, span, warn, Instrument, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr = env::var("GEREVS_AUTH_ADDR").unwrap_or_else(|_| "0.0.0.0:1080".to_string());
    let secret = env::var("GEREVS_AUTH_SECRET").unwrap_or_else(|_| "gerevs".to_string());
    let username = env::var("GEREVS_AUTH_USER").unwrap_or_else(|_| "itamar".to_string());
    let password = env::var("GEREVS_AUTH_PASSWORD").unwrap_or_else(|_| "password".to_string());

    let store = Arc::new(MemoryStore::new(secret));
    store.set(username.as_bytes(), password.as_bytes())?;

    let server = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    loop {
        let (client, _addr) = server.accept().await?;
        debug!("Received connection from: {:?}", _addr);
        let connection = span!(Level::INFO, "connection", %_addr);

        let authenticator = UsernamePasswordAuthenticator::new(Arc::clone(&store));
        tokio::spawn(
            async move {
                let result = handle_connection(client, authenticator).await;
                if let Err(err) = result {
                    warn!("Failed connection: {:?}", err);
                }
            }
            .instrument(connection),
        );
    }
}

async fn handle_connection<A>(mut client: TcpStream, authenticator: A) -> gerevs_auth::Result<()>
where
    A: Authenticator,
    A::Credentials: std::fmt::Debug,
{
    let mut header = [0; 2];
    client.read_exact(&mut header).await?;
    if header[0] != VERSION {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "Not a SOCKS5 client").into());
    }

    let mut methods = vec![0; header[1] as usize];
    client.read_exact(&mut methods).await?;
    let methods: Vec<_> = methods.into_iter().map(AuthMethod::from_u8).collect();

    let method = authenticator.select_method(&methods);
    client.write_all(&[VERSION, method.to_u8()]).await?;
    if method == AuthMethod::NoAcceptableMethods {
        return Err(io::Error::new(io::ErrorKind::Unsupported, "No acceptable methods").into());
    }

    let (mut reader, mut writer) = client.split();
    let credentials = authenticator.authenticate(&mut reader, &mut writer).await?;
    info!("Authenticated: {:?}", credentials);
    Ok(())
}
