//! Core: configuration, shared state, server lifecycle and the domain error
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - HTTP server
//! - [`MarketError`] - domain error taxonomy

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{AdminBootstrap, Config};
pub use error::{MarketError, MarketResult};
pub use server::Server;
pub use state::ServerState;
