//! Turbo wire-format elements.
//!
//! This crate provides the element model for the Turbo live-update protocol:
//! - `Attributes` - Insertion-ordered HTML attribute mapping
//! - `Element` trait - Render capability shared by all element kinds
//! - `TurboFrame` - A replaceable page region identified by id
//! - `StreamElement` - A single DOM-patch instruction
//! - `Action` - The patch operation vocabulary
//!
//! Elements validate on construction and are immutable afterwards. Attribute
//! names and values are rendered verbatim; escaping is the caller's concern.

mod action;
mod attributes;
mod element;
mod error;
mod frame;
mod stream_element;

pub use action::*;
pub use attributes::*;
pub use element::*;
pub use error::*;
pub use frame::*;
pub use stream_element::*;
