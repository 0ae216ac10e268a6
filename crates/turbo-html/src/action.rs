//! The Turbo stream action vocabulary.

use std::fmt;
use std::sync::Once;

/// Names of the first-class actions, in wire order.
pub const ACTION_NAMES: [&str; 8] = [
    "append", "prepend", "replace", "update", "remove", "before", "after", "refresh",
];

/// A stream action: the patch operation name controlling render shape.
///
/// Any string outside the first-class vocabulary is carried as
/// [`Action::Custom`]; the wire only requires a non-empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Append content inside the target.
    Append,
    /// Prepend content inside the target.
    Prepend,
    /// Replace the target element.
    Replace,
    /// Update the target's content.
    Update,
    /// Remove the target element. Renders without a template wrapper.
    Remove,
    /// Insert content before the target.
    Before,
    /// Insert content after the target.
    After,
    /// Reload the page. Needs no target and renders without a template wrapper.
    Refresh,
    /// Morph the target. Deprecated upstream; kept for compatibility.
    Morph,
    /// A free-form action outside the first-class vocabulary.
    Custom(String),
}

impl Action {
    /// Parse an action from its wire name. Unrecognized names become
    /// [`Action::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "append" => Self::Append,
            "prepend" => Self::Prepend,
            "replace" => Self::Replace,
            "update" => Self::Update,
            "remove" => Self::Remove,
            "before" => Self::Before,
            "after" => Self::After,
            "refresh" => Self::Refresh,
            "morph" => Self::Morph,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The wire name of this action.
    pub fn name(&self) -> &str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Before => "before",
            Self::After => "after",
            Self::Refresh => "refresh",
            Self::Morph => "morph",
            Self::Custom(name) => name,
        }
    }

    /// Whether rendering wraps the content in a `<template>` element.
    /// `remove` and `refresh` discard content and render without one.
    pub fn wraps_template(&self) -> bool {
        !matches!(self, Self::Remove | Self::Refresh)
    }

    /// Whether the action requires exactly one of `target`/`targets`.
    pub fn requires_target(&self) -> bool {
        !matches!(self, Self::Refresh)
    }

    /// Whether the action is deprecated upstream.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Morph)
    }

    /// Emit a one-time deprecation notice for deprecated actions.
    pub(crate) fn warn_if_deprecated(&self) {
        static MORPH_DEPRECATION: Once = Once::new();

        if self.is_deprecated() {
            MORPH_DEPRECATION.call_once(|| {
                tracing::warn!(
                    action = self.name(),
                    "the \"morph\" action is deprecated; prefer \"replace\" or \"update\""
                );
            });
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_first_class_actions() {
        for name in ACTION_NAMES {
            assert_eq!(Action::from_name(name).name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_custom() {
        let action = Action::from_name("highlight");
        assert_eq!(action, Action::Custom("highlight".to_string()));
        assert_eq!(action.name(), "highlight");
        assert!(action.wraps_template());
        assert!(action.requires_target());
    }

    #[test]
    fn test_template_wrapper_shape() {
        assert!(!Action::Remove.wraps_template());
        assert!(!Action::Refresh.wraps_template());
        assert!(Action::Append.wraps_template());
        assert!(Action::Morph.wraps_template());
    }

    #[test]
    fn test_only_refresh_skips_target() {
        assert!(!Action::Refresh.requires_target());
        assert!(Action::Remove.requires_target());
        assert!(Action::Morph.requires_target());
    }

    #[test]
    fn test_morph_is_deprecated() {
        assert!(Action::Morph.is_deprecated());
        assert!(!Action::Replace.is_deprecated());
    }
}
