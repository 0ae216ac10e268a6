//! Turbo stream messages.
//!
//! This crate provides the emission model for Turbo stream fragments:
//! - `TurboStream` - An ordered, event-emitting collection of stream elements
//!   with a configurable buffering policy
//! - `MessageConfig` / `ConfigPatch` - The buffering configuration
//! - `TurboReader` - A pull-based stream fed by a message's element
//!   notifications
//!
//! Everything here is single-threaded and notification-driven. Message
//! operations are synchronous and complete before returning; notification
//! delivery is synchronous and in registration order. A subscriber that
//! re-enters the message during dispatch interleaves with the in-progress
//! operation (and panics on a `RefCell`-shared message) - an accepted hazard,
//! not something this crate locks against.

mod config;
mod message;
mod reader;

pub use config::*;
pub use message::*;
pub use reader::*;
