//! Presence actor event handlers.
//!
//! Each submodule handles one inbound event processed by
//! [`PresenceActor`](super::PresenceActor). Handler steps run in a fixed
//! order; later steps read registry state written by earlier ones.

pub mod area;
pub mod broadcast;
pub mod disconnect;
pub mod join;
pub mod visitor;
