//! Participant records.
//!
//! Records have a fixed core of fields the server reasons about, plus an
//! [`Attributes`] map holding every profile field the server merely
//! carries. The map is serialized flat next to the core fields, so the
//! wire shape is a single JSON object.

use crate::role::Role;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Profile fields the server does not model.
pub type Attributes = Map<String, Value>;

/// Overlay another value's present fields onto `self`.
pub trait Merge {
    /// Merge `other` into `self`; fields absent in `other` are kept.
    fn merge(&mut self, other: Self);
}

/// A user participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Stable external identity; absent for guests.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<String>,
    /// Participant role as declared in the payload.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Ephemeral identity of the connection that owns this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    /// Area name requested by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Area the user currently occupies.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_in_this_area: Option<String>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: Attributes,
}

impl UserRecord {
    /// Key function selecting the `uid`.
    pub fn by_uid(record: &UserRecord) -> Option<&str> {
        record.uid.as_deref()
    }

    /// Key function selecting the `socketId`.
    pub fn by_socket(record: &UserRecord) -> Option<&str> {
        record.socket_id.as_deref()
    }

    /// Whether the record carries a `uid`.
    pub fn has_uid(&self) -> bool {
        self.uid.is_some()
    }

    /// Builder-style `socketId` assignment.
    pub fn with_socket(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }
}

impl Merge for UserRecord {
    fn merge(&mut self, other: Self) {
        if other.uid.is_some() {
            self.uid = other.uid;
        }
        if other.role.is_some() {
            self.role = other.role;
        }
        if other.socket_id.is_some() {
            self.socket_id = other.socket_id;
        }
        if other.room.is_some() {
            self.room = other.room;
        }
        if other.user_in_this_area.is_some() {
            self.user_in_this_area = other.user_in_this_area;
        }
        self.extra.extend(other.extra);
    }
}

/// A visitor observing one or more hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    /// `uid`s of the users this visitor may observe.
    #[serde(default)]
    pub host_ids: Vec<String>,
    /// Connection identity of the visitor.
    pub socket_id: String,
    /// Everything else.
    #[serde(flatten)]
    pub extra: Attributes,
}

impl VisitorRecord {
    /// Key function selecting the `socketId`.
    pub fn by_socket(record: &VisitorRecord) -> Option<&str> {
        Some(record.socket_id.as_str())
    }

    /// Whether `uid` is one of this visitor's hosts.
    pub fn observes(&self, uid: Option<&str>) -> bool {
        uid.is_some_and(|uid| self.host_ids.iter().any(|h| h == uid))
    }
}

impl Merge for VisitorRecord {
    fn merge(&mut self, other: Self) {
        self.host_ids = other.host_ids;
        self.socket_id = other.socket_id;
        self.extra.extend(other.extra);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(serde_json::Number),
}

/// Ids arrive as strings from most clients, numbers from some.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Str(s) => s,
        Scalar::Num(n) => n.to_string(),
    }))
}

/// Like [`string_or_number`], but a numeric zero counts as absent.
pub(crate) fn nonzero_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Num(n)) if n.as_f64() == Some(0.0) => None,
        Some(Scalar::Num(n)) => Some(n.to_string()),
        Some(Scalar::Str(s)) => Some(s),
        None => None,
    })
}
