//! HTTP framing for the control API.
//!
//! One request per connection, no keep-alive, no chunked bodies.
//!
//! - **`channel`**: per-connection inbound buffer and outbound write queue
//! - **`parser`**: header terminator search and header section parsing
//! - **`peer`**: the per-connection parse state machine
//! - **`connection`**: tokio task glue between a socket and its peer
//! - **`request`**, **`response`**, **`writer`**: message types and framing
//!
//! # Peer State Machine
//!
//! ```text
//!        ┌─────────────────┐
//!        │  ReadingHeader  │ ← scan for \r\n\r\n
//!        └──────┬──────────┘
//!               │ header parsed
//!               ├─ Content-Length 0 → dispatch
//!               ▼
//!        ┌─────────────────┐
//!        │   ReadingBody   │ ← wait for Content-Length bytes
//!        └──────┬──────────┘
//!               │ body complete → dispatch
//!               ▼
//!        response queued → close (flush)
//! ```
//!
//! A transport error at any point closes the connection without sending.

pub mod channel;
pub mod connection;
pub mod parser;
pub mod peer;
pub mod request;
pub mod response;
pub mod writer;
