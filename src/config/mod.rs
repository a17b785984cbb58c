//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ConfigError)
//! - [`listen`]: WebSocket listener configuration (ListenConfig)
//! - [`limits`]: Queue and frame size limits (LimitsConfig)
//! - [`validation`]: Startup validation

mod limits;
mod listen;
mod types;
pub mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::Config;
