//! Insertion-ordered HTML attribute mapping.

use indexmap::IndexMap;

/// An ordered mapping of attribute name to value.
///
/// A `None` value marks a boolean (valueless) attribute, which renders as the
/// bare name. Iteration and rendering follow insertion order, so output is
/// deterministic. Neither names nor values are escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, Option<String>>,
}

impl Attributes {
    /// Create an empty attribute mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a valued attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), Some(value.into()));
    }

    /// Insert or replace a boolean (valueless) attribute.
    pub fn insert_flag(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), None);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style [`insert_flag`](Self::insert_flag).
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.insert_flag(name);
        self
    }

    /// Look up an attribute. The outer `Option` is presence; the inner one
    /// distinguishes a valued attribute from a boolean flag.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries.get(name).map(|value| value.as_deref())
    }

    /// The value of a valued attribute, or `None` if absent or a flag.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name)?.as_deref()
    }

    /// Whether an attribute with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Shallow merge: entries of `other` are inserted in order, replacing
    /// existing values for the same name.
    pub fn merge(&mut self, other: Attributes) {
        for (name, value) in other.entries {
            self.entries.insert(name, value);
        }
    }

    /// Render as an HTML attribute string: `name="value"` entries joined by
    /// single spaces, flags as the bare name, in insertion order.
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| match value {
                Some(value) => format!("{}=\"{}\"", name, value),
                None => name.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

/// Build an [`Attributes`] literal.
///
/// ```
/// use turbo_html::attrs;
///
/// let a = attrs! { "action" => "append", "target" => "messages", "defer" };
/// assert_eq!(a.to_html(), r#"action="append" target="messages" defer"#);
/// ```
#[macro_export]
macro_rules! attrs {
    ($($name:literal $(=> $value:expr)?),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut attrs = $crate::Attributes::new();
        $( $crate::__attrs_entry!(attrs, $name $(, $value)?); )*
        attrs
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __attrs_entry {
    ($attrs:ident, $name:expr) => {
        $attrs.insert_flag($name)
    };
    ($attrs:ident, $name:expr, $value:expr) => {
        $attrs.insert($name, $value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_preserves_insertion_order() {
        let attrs = Attributes::new()
            .with("action", "append")
            .with("target", "messages");
        assert_eq!(attrs.to_html(), r#"action="append" target="messages""#);
    }

    #[test]
    fn test_flag_renders_bare_name() {
        let attrs = Attributes::new().with("id", "frame").with_flag("disabled");
        assert_eq!(attrs.to_html(), r#"id="frame" disabled"#);
    }

    #[test]
    fn test_no_escaping_is_performed() {
        let attrs = Attributes::new().with("data-x", "a\"b");
        assert_eq!(attrs.to_html(), "data-x=\"a\"b\"");
    }

    #[test]
    fn test_get_distinguishes_flag_from_absent() {
        let attrs = Attributes::new().with_flag("disabled");
        assert_eq!(attrs.get("disabled"), Some(None));
        assert_eq!(attrs.get("enabled"), None);
        assert_eq!(attrs.value_of("disabled"), None);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut attrs = Attributes::new().with("action", "append").with("target", "a");
        attrs.merge(Attributes::new().with("target", "b").with("id", "x"));
        assert_eq!(attrs.value_of("target"), Some("b"));
        assert_eq!(attrs.value_of("id"), Some("x"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_render_round_trips_keys_and_values() {
        let attrs = Attributes::new()
            .with("action", "append")
            .with("target", "t1")
            .with_flag("defer");
        let html = attrs.to_html();

        let mut rebuilt = Attributes::new();
        for part in html.split(' ') {
            match part.split_once('=') {
                Some((name, value)) => rebuilt.insert(name, value.trim_matches('"')),
                None => rebuilt.insert_flag(part),
            }
        }
        assert_eq!(rebuilt, attrs);
    }

    #[test]
    fn test_attrs_macro() {
        let attrs = attrs! { "id" => "a", "loading" => "lazy", "autofocus" };
        assert_eq!(attrs.to_html(), r#"id="a" loading="lazy" autofocus"#);
        assert!(attrs!{}.is_empty());
    }
}
