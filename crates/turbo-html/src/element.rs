//! Common element capability.

use crate::Attributes;

/// Capability shared by all rendered element kinds.
///
/// Implementors validate their attributes in their constructors, so every
/// value of an implementing type renders a well-formed fragment.
pub trait Element {
    /// The attribute mapping, fixed at construction time.
    fn attributes(&self) -> &Attributes;

    /// The HTML content, fixed at construction time. May be empty.
    fn content(&self) -> &str;

    /// Render the element as an HTML fragment string.
    fn render(&self) -> String;

    /// Render the attribute mapping as an HTML attribute string.
    fn render_attributes(&self) -> String {
        self.attributes().to_html()
    }
}
