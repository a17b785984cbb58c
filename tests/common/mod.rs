//! Integration test common infrastructure.
//!
//! Provides utilities for spawning test servers, creating WebSocket
//! clients, and asserting on presence event flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
