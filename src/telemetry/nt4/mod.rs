//! NT4 - NetworkTables 4 Transport
//!
//! Minimal client for the NT4 WebSocket protocol: scalar topics only, no
//! RPC, no array types, no persistent-topic management.

mod client;
pub mod codec;
pub mod server;

pub use client::Nt4Client;
