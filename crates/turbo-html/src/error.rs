//! Validation errors for element construction.

use thiserror::Error;

/// Errors raised while validating element attributes.
///
/// All element constructors surface these synchronously; a failed
/// construction never yields a partially-valid element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory attribute key is absent.
    #[error("missing attribute: {0}")]
    AttributeMissing(String),

    /// A mandatory attribute is present but not a non-empty string.
    #[error("malformed attribute: {0}")]
    AttributeMalformed(String),

    /// Mutually exclusive attributes are both present.
    #[error("invalid attributes: {0}")]
    AttributeInvalid(String),
}
