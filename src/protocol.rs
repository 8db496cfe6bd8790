mod methods;
mod user_password;

pub use methods::AuthMethod;
pub use user_password::{write_status, AuthStatus, UserPasswordRequest};

/// SOCKS protocol version, sent in the method selection reply.
pub const VERSION: u8 = 0x05;

/// Version of the username/password sub-negotiation (RFC 1929).
pub const USER_PASSWORD_VERSION: u8 = 0x01;
