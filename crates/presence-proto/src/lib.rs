//! # presence-proto
//!
//! Wire protocol shared by the `presenced` server and its clients.
//!
//! ## Features
//!
//! - JSON frame envelope (`{"event": ..., "data": ...}`) carried in WebSocket text frames
//! - Typed inbound events with payload decoding
//! - Participant records with a fixed core and an auxiliary attribute map
//! - Handshake identity extraction from upgrade request headers
//!
//! ## Quick Start
//!
//! ```rust
//! use presence_proto::{Frame, InboundEvent};
//!
//! let raw = r#"{"event":"client-emit-user-joined","data":{"type":"user","uid":"u1"}}"#;
//! let frame: Frame = raw.parse().expect("valid frame");
//!
//! match InboundEvent::try_from(frame).expect("known event") {
//!     InboundEvent::UserJoined(payload) => assert_eq!(payload.uid.as_deref(), Some("u1")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod frame;
pub mod handshake;
pub mod record;
pub mod role;

pub use self::error::{ProtocolError, Result};
pub use self::event::{AreaEntry, InboundEvent, OutboundEvent, VisitorAnnouncement};
pub use self::frame::Frame;
pub use self::handshake::{HandshakeIdentity, REQUIRED_HEADERS};
pub use self::record::{Attributes, Merge, UserRecord, VisitorRecord};
pub use self::role::Role;
