//! Turbo frames: replaceable page regions identified by id.

use crate::{Attributes, Element, ValidationError};

/// A Turbo frame fragment.
///
/// Requires a non-empty `id` attribute; validation runs on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurboFrame {
    attributes: Attributes,
    content: String,
}

impl TurboFrame {
    /// HTTP header carrying the requesting frame's id.
    pub const HEADER_KEY: &'static str = "turbo-frame";

    /// MIME type of a Turbo frame response.
    pub const MIME_TYPE: &'static str = "text/html";

    /// Create a frame from a bare id.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::from_attributes(Attributes::new().with("id", id), content)
    }

    /// Create a frame from a full attribute mapping, which must contain a
    /// non-empty `id`.
    pub fn from_attributes(
        attributes: Attributes,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::validate(&attributes)?;
        Ok(Self {
            attributes,
            content: content.into(),
        })
    }

    /// The frame's id.
    pub fn id(&self) -> &str {
        // Guaranteed non-empty by validation.
        self.attributes.value_of("id").unwrap_or_default()
    }

    fn validate(attributes: &Attributes) -> Result<(), ValidationError> {
        match attributes.get("id") {
            None => Err(ValidationError::AttributeMissing(
                "TurboFrame: attribute \"id\" is missing".to_string(),
            )),
            Some(None) => Err(ValidationError::AttributeMalformed(
                "TurboFrame: attribute \"id\" must be a non-empty string".to_string(),
            )),
            Some(Some(id)) if id.is_empty() => Err(ValidationError::AttributeMalformed(
                "TurboFrame: attribute \"id\" must be a non-empty string".to_string(),
            )),
            Some(Some(_)) => Ok(()),
        }
    }
}

impl Element for TurboFrame {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn render(&self) -> String {
        format!(
            "<turbo-frame {}>{}</turbo-frame>",
            self.render_attributes(),
            self.content
        )
    }
}
