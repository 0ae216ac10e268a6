//! Message configuration.

use serde::{Deserialize, Serialize};

/// Configuration of a [`TurboStream`](crate::TurboStream) message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageConfig {
    /// When `true` (the default), added elements are retained in the buffer
    /// for later bulk rendering. When `false`, elements are emitted via the
    /// element notification only and never retained.
    pub buffer: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { buffer: true }
    }
}

impl MessageConfig {
    /// Set the buffering flag.
    pub fn with_buffer(mut self, buffer: bool) -> Self {
        self.buffer = buffer;
        self
    }

    /// Apply a patch. Returns `true` if anything changed or was set.
    pub(crate) fn apply(&mut self, patch: &ConfigPatch) -> bool {
        match patch.buffer {
            Some(buffer) => {
                self.buffer = buffer;
                true
            }
            None => false,
        }
    }
}

/// A partial update to [`MessageConfig`]. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    /// New value for [`MessageConfig::buffer`], if any.
    pub buffer: Option<bool>,
}

impl ConfigPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch the buffering flag.
    pub fn buffer(mut self, buffer: bool) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Whether the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }
}
