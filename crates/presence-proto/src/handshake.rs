//! Handshake identity.
//!
//! Clients identify themselves with four headers on the WebSocket
//! upgrade request. All four must be present for the connection to be
//! admitted; values are not otherwise validated.

use crate::role::Role;

/// Subject id header.
pub const HEADER_SUBJECT: &str = "x-user-sub";
/// Display name header.
pub const HEADER_NAME: &str = "x-user-name";
/// Email header.
pub const HEADER_EMAIL: &str = "x-user-email";
/// User type header.
pub const HEADER_TYPE: &str = "x-user-type";

/// Headers every connection must carry, in check order.
pub const REQUIRED_HEADERS: [&str; 4] = [HEADER_SUBJECT, HEADER_NAME, HEADER_EMAIL, HEADER_TYPE];

/// Identity declared by a connection at handshake time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeIdentity {
    /// Subject id (`x-user-sub`).
    pub subject: String,
    /// Display name (`x-user-name`).
    pub name: String,
    /// Email (`x-user-email`).
    pub email: String,
    /// Connection role (`x-user-type`).
    pub role: Role,
}

impl HandshakeIdentity {
    /// Build an identity from a header lookup.
    ///
    /// Returns the names of every missing header on failure.
    pub fn from_lookup<F, V>(lookup: F) -> Result<Self, Vec<&'static str>>
    where
        F: Fn(&str) -> Option<V>,
        V: Into<String>,
    {
        let values = REQUIRED_HEADERS.map(|h| lookup(h).map(Into::into));
        let missing: Vec<&'static str> = REQUIRED_HEADERS
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(h, _)| *h)
            .collect();

        match values {
            [Some(subject), Some(name), Some(email), Some(kind)] => Ok(Self {
                subject,
                name,
                email,
                role: Role::from(kind),
            }),
            _ => Err(missing),
        }
    }

    /// Build an identity from upgrade request headers.
    ///
    /// Only presence is checked; values that are not valid UTF-8 are
    /// decoded lossily.
    #[cfg(feature = "tokio")]
    pub fn from_headers(
        headers: &tokio_tungstenite::tungstenite::http::HeaderMap,
    ) -> Result<Self, Vec<&'static str>> {
        Self::from_lookup(|name| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        })
    }
}
