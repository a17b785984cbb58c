//! Network module.
//!
//! Contains the Gateway (WebSocket listener), the Connection Gate, and the
//! per-connection task.

mod connection;
pub mod gate;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
