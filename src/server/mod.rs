//! Listening socket and peer registry.

pub mod listener;

pub use listener::Server;
