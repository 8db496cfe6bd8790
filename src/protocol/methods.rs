const NO_AUTH_REQUIRED: u8 = 0x00;
const GSSAPI: u8 = 0x01;
const USERNAME_PASSWORD: u8 = 0x02;

const IANA_ASSIGNED_LOWER: u8 = 0x03;
const IANA_ASSIGNED_UPPER: u8 = 0x7F;

const PRIVATE_METHOD_LOWER: u8 = 0x80;
const PRIVATE_METHOD_UPPER: u8 = 0xFE;

const NO_ACCEPTABLE_METHODS: u8 = 0xFF;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
/// The method id agreed upon during method negotiation, which decides the
/// [`Authenticator`](crate::auth::Authenticator) that runs for a connection.
pub enum AuthMethod {
    /// No authentication is required. This method allows clients to connect without providing any credentials.
    NoAuthRequired,

    /// GSSAPI (Generic Security Services Application Program Interface) authentication method.
    Gssapi,

    /// Username and password authentication method (RFC 1929).
    UsernamePassword,

    /// IANA (Internet Assigned Numbers Authority) assigned authentication methods, represented by a `u8` value.
    IanaAssigned(u8),

    /// Private authentication methods, represented by a `u8` value.
    PrivateMethods(u8),

    /// Sent by the server when none of the methods offered by the client are acceptable.
    NoAcceptableMethods,
}

impl AuthMethod {
    pub fn from_u8(value: u8) -> Self {
        match value {
            NO_AUTH_REQUIRED => AuthMethod::NoAuthRequired,
            GSSAPI => AuthMethod::Gssapi,
            USERNAME_PASSWORD => AuthMethod::UsernamePassword,
            IANA_ASSIGNED_LOWER..=IANA_ASSIGNED_UPPER => AuthMethod::IanaAssigned(value),
            PRIVATE_METHOD_LOWER..=PRIVATE_METHOD_UPPER => AuthMethod::PrivateMethods(value),
            NO_ACCEPTABLE_METHODS => AuthMethod::NoAcceptableMethods,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            AuthMethod::NoAuthRequired => NO_AUTH_REQUIRED,
            AuthMethod::Gssapi => GSSAPI,
            AuthMethod::UsernamePassword => USERNAME_PASSWORD,
            AuthMethod::IanaAssigned(value) => value,
            AuthMethod::PrivateMethods(value) => value,
            AuthMethod::NoAcceptableMethods => NO_ACCEPTABLE_METHODS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods() {
        assert_eq!(AuthMethod::from_u8(0x00), AuthMethod::NoAuthRequired);
        assert_eq!(AuthMethod::from_u8(0x01), AuthMethod::Gssapi);
        assert_eq!(AuthMethod::from_u8(0x02), AuthMethod::UsernamePassword);
        assert_eq!(AuthMethod::from_u8(0xFF), AuthMethod::NoAcceptableMethods);
    }

    #[test]
    fn ranges_keep_their_id() {
        assert_eq!(AuthMethod::from_u8(0x03), AuthMethod::IanaAssigned(0x03));
        assert_eq!(AuthMethod::from_u8(0x7F), AuthMethod::IanaAssigned(0x7F));
        assert_eq!(AuthMethod::from_u8(0x80), AuthMethod::PrivateMethods(0x80));
        assert_eq!(AuthMethod::PrivateMethods(0xFE).to_u8(), 0xFE);
    }

    #[test]
    fn every_id_maps_back_to_itself() {
        for id in 0..=u8::MAX {
            assert_eq!(AuthMethod::from_u8(id).to_u8(), id);
        }
    }
}
