//! Transport adapters for Turbo messages.
//!
//! Messages and elements are transport-agnostic; this crate bridges them to
//! concrete boundaries:
//! - `request` - Classifying incoming requests by `http` header inspection
//! - `TransportBridge` / `HttpBridge` - Request/response cycle
//! - `SseStream` - Server-sent event framing and piping
//! - `SocketStream` - Fan-out to a persistent socket's send queue
//!
//! Bridges are explicit adapter values composed by the host application;
//! nothing here is attached to shared framework state.

mod bridge;
pub mod request;
mod socket;
mod sse;

pub use bridge::*;
pub use socket::*;
pub use sse::*;
