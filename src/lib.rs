//! Stream monitor - control API of the streaming platform
//!
//! Accepts one JSON control command per HTTP connection and forwards it to
//! the sharding subsystem.

pub mod config;
pub mod control;
pub mod http;
pub mod server;
pub mod shard;
