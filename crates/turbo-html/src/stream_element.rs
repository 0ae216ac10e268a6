//! Turbo stream elements: single DOM-patch instructions.

use crate::{Action, Attributes, Element, ValidationError};

/// A single Turbo stream fragment.
///
/// Requires an `action` attribute and, for every action but `refresh`,
/// exactly one of `target`/`targets` as a non-empty string. Validation runs
/// on construction; instances are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamElement {
    attributes: Attributes,
    content: String,
    action: Action,
}

impl StreamElement {
    /// Create a stream element from an attribute mapping and content.
    pub fn new(
        attributes: Attributes,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let action = Self::validate(&attributes)?;
        action.warn_if_deprecated();

        Ok(Self {
            attributes,
            content: content.into(),
            action,
        })
    }

    /// The parsed action of this element.
    pub fn action(&self) -> &Action {
        &self.action
    }

    fn validate(attributes: &Attributes) -> Result<Action, ValidationError> {
        let action = match attributes.get("action") {
            None => {
                return Err(ValidationError::AttributeMissing(
                    "TurboStream: attribute \"action\" is missing".to_string(),
                ))
            }
            Some(None) => {
                return Err(ValidationError::AttributeMalformed(
                    "TurboStream: attribute \"action\" must be a non-empty string".to_string(),
                ))
            }
            Some(Some(name)) if name.is_empty() => {
                return Err(ValidationError::AttributeMalformed(
                    "TurboStream: attribute \"action\" must be a non-empty string".to_string(),
                ))
            }
            Some(Some(name)) => Action::from_name(name),
        };

        if action.requires_target() {
            match (attributes.get("target"), attributes.get("targets")) {
                (None, None) => {
                    return Err(ValidationError::AttributeMissing(
                        "TurboStream: attribute \"target\" or \"targets\" is missing".to_string(),
                    ))
                }
                (Some(_), Some(_)) => {
                    return Err(ValidationError::AttributeInvalid(
                        "TurboStream: attributes \"target\" and \"targets\" exclude each other"
                            .to_string(),
                    ))
                }
                (Some(value), None) | (None, Some(value)) => match value {
                    Some(value) if !value.is_empty() => {}
                    _ => {
                        return Err(ValidationError::AttributeMalformed(
                            "TurboStream: attribute \"target\"/\"targets\" must be a non-empty string"
                                .to_string(),
                        ))
                    }
                },
            }
        }

        Ok(action)
    }
}

impl Element for StreamElement {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn render(&self) -> String {
        if self.action.wraps_template() {
            format!(
                "<turbo-stream {}><template>{}</template></turbo-stream>",
                self.render_attributes(),
                self.content
            )
        } else {
            format!("<turbo-stream {}></turbo-stream>", self.render_attributes())
        }
    }
}
