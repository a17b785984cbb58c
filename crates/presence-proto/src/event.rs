//! Inbound and outbound events.
//!
//! Event names are fixed strings shared with existing clients; see
//! [`names`].

use crate::error::{ProtocolError, Result};
use crate::frame::Frame;
use crate::record::{Attributes, UserRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event names used on the wire.
pub mod names {
    /// Client announces itself.
    pub const USER_JOINED: &str = "client-emit-user-joined";
    /// Client enters an area.
    pub const USER_JOINED_AN_AREA: &str = "client-emit-user-joined-an-area";
    /// Visitor declares which hosts it observes.
    pub const VISITOR_JOINED: &str = "client-emit-visitor-joined";

    /// Active area users after a join.
    pub const SERVER_USER_JOINED: &str = "server-emit-user-joined";
    /// Active area users after an area entry.
    pub const SERVER_USER_JOINED_AN_AREA: &str = "server-emit-user-joined-an-area";
    /// A host of the receiving visitor became reachable.
    pub const SERVER_VISITOR_JOINED: &str = "server-emit-visitor-joined";
    /// Active area users after a disconnect.
    pub const SERVER_USER_LEFT: &str = "server-emit-user-left-or-logged-out";
}

/// Payload of `client-emit-user-joined-an-area`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaEntry {
    /// Profile of the entering user.
    #[serde(default)]
    pub local_profile: Option<UserRecord>,
    /// Area being entered. A numeric `0` decodes as absent.
    #[serde(
        default,
        deserialize_with = "crate::record::nonzero_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_area_id: Option<String>,
}

/// Payload of `client-emit-visitor-joined`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorAnnouncement {
    /// `uid`s of the hosts the visitor wants to observe.
    #[serde(default)]
    pub host_ids: Vec<String>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Events a client may send.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `client-emit-user-joined`
    UserJoined(UserRecord),
    /// `client-emit-user-joined-an-area`
    UserJoinedAnArea(AreaEntry),
    /// `client-emit-visitor-joined`
    VisitorJoined(VisitorAnnouncement),
}

impl InboundEvent {
    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => names::USER_JOINED,
            Self::UserJoinedAnArea(_) => names::USER_JOINED_AN_AREA,
            Self::VisitorJoined(_) => names::VISITOR_JOINED,
        }
    }

    /// Encode into a frame (used by clients and tests).
    pub fn into_frame(self) -> Result<Frame> {
        match self {
            Self::UserJoined(p) => Frame::with_payload(names::USER_JOINED, &p),
            Self::UserJoinedAnArea(p) => Frame::with_payload(names::USER_JOINED_AN_AREA, &p),
            Self::VisitorJoined(p) => Frame::with_payload(names::VISITOR_JOINED, &p),
        }
    }
}

fn payload<T: DeserializeOwned>(event: &'static str, data: Option<Value>) -> Result<T> {
    serde_json::from_value(data.unwrap_or(Value::Null))
        .map_err(|source| ProtocolError::MalformedPayload { event, source })
}

impl TryFrom<Frame> for InboundEvent {
    type Error = ProtocolError;

    fn try_from(frame: Frame) -> Result<Self> {
        match frame.event.as_str() {
            names::USER_JOINED => payload(names::USER_JOINED, frame.data).map(Self::UserJoined),
            names::USER_JOINED_AN_AREA => {
                payload(names::USER_JOINED_AN_AREA, frame.data).map(Self::UserJoinedAnArea)
            }
            names::VISITOR_JOINED => {
                payload(names::VISITOR_JOINED, frame.data).map(Self::VisitorJoined)
            }
            _ => Err(ProtocolError::UnknownEvent(frame.event)),
        }
    }
}

/// Events the server sends. Every payload is a list of user records.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// `server-emit-user-joined`
    UserJoined(Vec<UserRecord>),
    /// `server-emit-user-joined-an-area`
    UserJoinedAnArea(Vec<UserRecord>),
    /// `server-emit-visitor-joined`
    VisitorJoined(Vec<UserRecord>),
    /// `server-emit-user-left-or-logged-out`
    UserLeftOrLoggedOut(Vec<UserRecord>),
}

impl OutboundEvent {
    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => names::SERVER_USER_JOINED,
            Self::UserJoinedAnArea(_) => names::SERVER_USER_JOINED_AN_AREA,
            Self::VisitorJoined(_) => names::SERVER_VISITOR_JOINED,
            Self::UserLeftOrLoggedOut(_) => names::SERVER_USER_LEFT,
        }
    }

    /// Records carried by the event.
    pub fn users(&self) -> &[UserRecord] {
        match self {
            Self::UserJoined(u)
            | Self::UserJoinedAnArea(u)
            | Self::VisitorJoined(u)
            | Self::UserLeftOrLoggedOut(u) => u,
        }
    }

    /// Encode into a frame.
    pub fn to_frame(&self) -> Result<Frame> {
        Frame::with_payload(self.name(), &self.users())
    }
}

impl TryFrom<Frame> for OutboundEvent {
    type Error = ProtocolError;

    fn try_from(frame: Frame) -> Result<Self> {
        match frame.event.as_str() {
            names::SERVER_USER_JOINED => {
                payload(names::SERVER_USER_JOINED, frame.data).map(Self::UserJoined)
            }
            names::SERVER_USER_JOINED_AN_AREA => {
                payload(names::SERVER_USER_JOINED_AN_AREA, frame.data).map(Self::UserJoinedAnArea)
            }
            names::SERVER_VISITOR_JOINED => {
                payload(names::SERVER_VISITOR_JOINED, frame.data).map(Self::VisitorJoined)
            }
            names::SERVER_USER_LEFT => {
                payload(names::SERVER_USER_LEFT, frame.data).map(Self::UserLeftOrLoggedOut)
            }
            _ => Err(ProtocolError::UnknownEvent(frame.event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use serde_json::json;

    #[test]
    fn decodes_user_joined() {
        let frame = Frame::new(names::USER_JOINED, json!({"type": "user", "uid": "u1"}));
        let InboundEvent::UserJoined(record) = InboundEvent::try_from(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(record.role, Some(Role::User));
        assert_eq!(record.uid.as_deref(), Some("u1"));
    }

    #[test]
    fn zero_area_id_counts_as_absent() {
        let frame = Frame::new(
            names::USER_JOINED_AN_AREA,
            json!({"localProfile": {"uid": 7, "room": "lobby-1"}, "lastAreaId": 0}),
        );
        let InboundEvent::UserJoinedAnArea(entry) = InboundEvent::try_from(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert!(entry.last_area_id.is_none());
        assert_eq!(entry.local_profile.unwrap().uid.as_deref(), Some("7"));

        let frame = Frame::new(names::USER_JOINED_AN_AREA, json!({"lastAreaId": 12}));
        let InboundEvent::UserJoinedAnArea(entry) = InboundEvent::try_from(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(entry.last_area_id.as_deref(), Some("12"));
    }

    #[test]
    fn decodes_area_entry_with_missing_profile() {
        let frame = Frame::new(names::USER_JOINED_AN_AREA, json!({"lastAreaId": "area-7"}));
        let InboundEvent::UserJoinedAnArea(entry) = InboundEvent::try_from(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert!(entry.local_profile.is_none());
        assert_eq!(entry.last_area_id.as_deref(), Some("area-7"));
    }

    #[test]
    fn missing_payload_is_malformed() {
        let err = InboundEvent::try_from(Frame::bare(names::USER_JOINED)).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload { .. }));
    }

    #[test]
    fn unknown_event_is_reported_by_name() {
        let err = InboundEvent::try_from(Frame::bare("client-emit-dance")).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(name) if name == "client-emit-dance"));
    }

    #[test]
    fn outbound_frame_carries_array_payload() {
        let event = OutboundEvent::UserLeftOrLoggedOut(Vec::new());
        let frame = event.to_frame().unwrap();
        assert_eq!(frame.event, names::SERVER_USER_LEFT);
        assert_eq!(frame.data, Some(json!([])));
        assert_eq!(OutboundEvent::try_from(frame).unwrap(), event);
    }
}
