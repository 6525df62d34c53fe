//! Control commands carried in request bodies.
//!
//! A request body is decoded into a typed [`Command`] before anything runs;
//! the [`Dispatcher`] then hands it to the sharding subsystem and produces
//! the reply.

pub mod command;
pub mod dispatcher;
pub mod stream_type;

pub use command::{Command, DispatchError};
pub use dispatcher::Dispatcher;
pub use stream_type::StreamType;
