//! State management module.
//!
//! Contains the presence actor, which owns every registry, and the
//! building blocks it is made of.

pub mod actor;
mod areas;
mod registry;
mod socket_id;

pub use actor::{PresenceActor, PresenceHandle, PresenceSnapshot};
pub use areas::AreaChannels;
pub use registry::{PresenceSet, Registries, UpdateOutcome};
pub use socket_id::SocketIdGenerator;

/// Ephemeral identity of one connection.
pub type SocketId = String;
