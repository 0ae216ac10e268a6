//! The Turbo stream message aggregate.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use turbo_html::{Action, Attributes, Element, StreamElement, ValidationError};

use crate::{ConfigPatch, MessageConfig};

/// A message shared between its producer and a live adapter.
///
/// Adapters such as [`TurboReader`](crate::TurboReader) subscribe to a
/// message's notifications and toggle its buffering flag, so both sides need
/// access to the same instance. Single-threaded by design; no locking.
pub type SharedMessage = Rc<RefCell<TurboStream>>;

/// Identifies one subscription on a [`TurboStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ElementHandler = Box<dyn FnMut(&StreamElement)>;
type RenderHandler = Box<dyn FnMut(&str)>;
type ClearHandler = Box<dyn FnMut()>;
type ConfigHandler = Box<dyn FnMut(&MessageConfig)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    element: Vec<(SubscriptionId, ElementHandler)>,
    render: Vec<(SubscriptionId, RenderHandler)>,
    clear: Vec<(SubscriptionId, ClearHandler)>,
    config: Vec<(SubscriptionId, ConfigHandler)>,
}

impl Subscribers {
    fn next(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Either a bare target id or a full attribute mapping.
///
/// The per-action convenience operations accept both: a string sets the
/// `target` attribute, a mapping is merged over the action and may carry
/// `target`/`targets`/extra attributes itself.
#[derive(Debug, Clone)]
pub enum Target {
    /// A target element id.
    Id(String),
    /// A full attribute mapping.
    Attributes(Attributes),
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Attributes> for Target {
    fn from(attributes: Attributes) -> Self {
        Self::Attributes(attributes)
    }
}

/// An ordered, event-emitting collection of stream elements.
///
/// Elements are appended through [`add_element`](Self::add_element) or the
/// per-action convenience operations. With buffering on (the default) they
/// are retained for bulk [`render`](Self::render)/[`flush`](Self::flush);
/// with buffering off they are only announced through the element
/// notification. Notifications fire synchronously, in registration order.
#[derive(Default)]
pub struct TurboStream {
    elements: Vec<StreamElement>,
    config: MessageConfig,
    subscribers: Subscribers,
}

impl fmt::Debug for TurboStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurboStream")
            .field("elements", &self.elements)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TurboStream {
    /// MIME type of a Turbo stream response.
    pub const MIME_TYPE: &'static str = "text/vnd.turbo-stream.html";

    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message pre-seeded with one element.
    pub fn with_element(
        attributes: Attributes,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut message = Self::new();
        message.add_element(attributes, content)?;
        Ok(message)
    }

    /// Move the message behind a shared handle for live adapters.
    pub fn into_shared(self) -> SharedMessage {
        Rc::new(RefCell::new(self))
    }

    /// The current configuration.
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    /// The buffered elements, in insertion order.
    pub fn elements(&self) -> &[StreamElement] {
        &self.elements
    }

    /// Number of buffered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Merge a patch into the configuration and emit the config
    /// notification. An empty patch is a chainable no-op.
    pub fn update_config(&mut self, patch: ConfigPatch) -> &mut Self {
        if self.config.apply(&patch) {
            tracing::debug!(?patch, "config updated");
            let config = self.config;
            self.emit_config(&config);
        }
        self
    }

    /// Construct a stream element and add it to the message.
    ///
    /// Validation failures propagate; nothing is buffered or announced on
    /// failure.
    pub fn add_element(
        &mut self,
        attributes: Attributes,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        let element = StreamElement::new(attributes, content)?;
        Ok(self.push_element(element))
    }

    /// Add an already-constructed stream element.
    ///
    /// Buffers the element iff `config.buffer` is on; always emits the
    /// element notification.
    pub fn push_element(&mut self, element: StreamElement) -> &mut Self {
        if self.config.buffer {
            self.elements.push(element.clone());
        }
        self.emit_element(&element);
        self
    }

    /// Empty the buffer. Always emits the cleared notification, even when
    /// the buffer was already empty.
    pub fn clear(&mut self) -> &mut Self {
        self.elements.clear();
        self.emit_clear();
        self
    }

    /// Render each buffered element individually, in order.
    ///
    /// Returns `None` when the buffer is empty, so callers can distinguish
    /// "no elements" from "elements render to the empty string".
    pub fn render_elements(&self) -> Option<Vec<String>> {
        if self.elements.is_empty() {
            return None;
        }
        Some(self.elements.iter().map(Element::render).collect())
    }

    /// Render the whole message: fragments joined by newlines.
    ///
    /// Emits the rendered notification with the joined string. Returns
    /// `None` when the buffer is empty.
    pub fn render(&mut self) -> Option<String> {
        let html = self.render_elements()?.join("\n");
        self.emit_render(&html);
        Some(html)
    }

    /// Render, then clear. Returns the pre-clear render result.
    ///
    /// Notification order is rendered (if anything rendered) then cleared,
    /// synchronously, before this returns.
    pub fn flush(&mut self) -> Option<String> {
        let html = self.render();
        self.clear();
        html
    }

    /// The rendered message split into lines, or empty when the buffer is.
    pub fn render_lines(&mut self) -> Vec<String> {
        self.render()
            .map(|html| html.split('\n').map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// A one-shot finite stream over the current rendered state - a
    /// snapshot, not a live feed. See [`TurboReader`](crate::TurboReader)
    /// for the continuous variant.
    pub fn snapshot_stream(&mut self) -> futures::stream::Iter<std::vec::IntoIter<String>> {
        futures::stream::iter(self.render_lines())
    }

    fn add_action(
        &mut self,
        action: Action,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        let mut attributes = Attributes::new().with("action", action.name());
        match target.into() {
            Target::Id(id) => attributes.insert("target", id),
            Target::Attributes(extra) => attributes.merge(extra),
        }
        self.add_element(attributes, content)
    }

    fn add_action_all(
        &mut self,
        action: Action,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_element(
            Attributes::new()
                .with("action", action.name())
                .with("targets", targets),
            content,
        )
    }

    /// Add an `append` element.
    pub fn append(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Append, target, content)
    }

    /// Add an `append` element targeting multiple DOM elements.
    pub fn append_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Append, targets, content)
    }

    /// Add a `prepend` element.
    pub fn prepend(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Prepend, target, content)
    }

    /// Add a `prepend` element targeting multiple DOM elements.
    pub fn prepend_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Prepend, targets, content)
    }

    /// Add a `replace` element.
    pub fn replace(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Replace, target, content)
    }

    /// Add a `replace` element targeting multiple DOM elements.
    pub fn replace_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Replace, targets, content)
    }

    /// Add an `update` element.
    pub fn update(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Update, target, content)
    }

    /// Add an `update` element targeting multiple DOM elements.
    pub fn update_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Update, targets, content)
    }

    /// Add a `remove` element. Content is not rendered for removals.
    pub fn remove(&mut self, target: impl Into<Target>) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Remove, target, "")
    }

    /// Add a `remove` element targeting multiple DOM elements.
    pub fn remove_all(&mut self, targets: impl Into<String>) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Remove, targets, "")
    }

    /// Add a `before` element.
    pub fn before(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Before, target, content)
    }

    /// Add a `before` element targeting multiple DOM elements.
    pub fn before_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Before, targets, content)
    }

    /// Add an `after` element.
    pub fn after(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::After, target, content)
    }

    /// Add an `after` element targeting multiple DOM elements.
    pub fn after_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::After, targets, content)
    }

    /// Add a `morph` element.
    #[deprecated(note = "the morph action is deprecated; use replace or update")]
    pub fn morph(
        &mut self,
        target: impl Into<Target>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action(Action::Morph, target, content)
    }

    /// Add a `morph` element targeting multiple DOM elements.
    #[deprecated(note = "the morph action is deprecated; use replace or update")]
    pub fn morph_all(
        &mut self,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_action_all(Action::Morph, targets, content)
    }

    /// Add a bare `refresh` element.
    pub fn refresh(&mut self) -> Result<&mut Self, ValidationError> {
        self.add_element(Attributes::new().with("action", "refresh"), "")
    }

    /// Add a `refresh` element carrying a `request-id` for debouncing.
    pub fn refresh_request(
        &mut self,
        request_id: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_element(
            Attributes::new()
                .with("action", "refresh")
                .with("request-id", request_id),
            "",
        )
    }

    /// Add a `refresh` element with extra attributes merged in.
    pub fn refresh_attrs(&mut self, attributes: Attributes) -> Result<&mut Self, ValidationError> {
        let mut attrs = Attributes::new().with("action", "refresh");
        attrs.merge(attributes);
        self.add_element(attrs, "")
    }

    /// Add an element with a custom action and a single target.
    pub fn custom(
        &mut self,
        action: impl Into<String>,
        target: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_element(
            Attributes::new()
                .with("action", action)
                .with("target", target),
            content,
        )
    }

    /// Add an element with a custom action targeting multiple DOM elements.
    pub fn custom_all(
        &mut self,
        action: impl Into<String>,
        targets: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.add_element(
            Attributes::new()
                .with("action", action)
                .with("targets", targets),
            content,
        )
    }

    /// Subscribe to the element-added notification.
    pub fn on_element(&mut self, handler: impl FnMut(&StreamElement) + 'static) -> SubscriptionId {
        let id = self.subscribers.next();
        self.subscribers.element.push((id, Box::new(handler)));
        id
    }

    /// Subscribe to the rendered notification.
    pub fn on_render(&mut self, handler: impl FnMut(&str) + 'static) -> SubscriptionId {
        let id = self.subscribers.next();
        self.subscribers.render.push((id, Box::new(handler)));
        id
    }

    /// Subscribe to the cleared notification.
    pub fn on_clear(&mut self, handler: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.subscribers.next();
        self.subscribers.clear.push((id, Box::new(handler)));
        id
    }

    /// Subscribe to the config-changed notification.
    pub fn on_config(&mut self, handler: impl FnMut(&MessageConfig) + 'static) -> SubscriptionId {
        let id = self.subscribers.next();
        self.subscribers.config.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns whether it was still registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let subs = &mut self.subscribers;
        let before =
            subs.element.len() + subs.render.len() + subs.clear.len() + subs.config.len();
        subs.element.retain(|(sid, _)| *sid != id);
        subs.render.retain(|(sid, _)| *sid != id);
        subs.clear.retain(|(sid, _)| *sid != id);
        subs.config.retain(|(sid, _)| *sid != id);
        let after = subs.element.len() + subs.render.len() + subs.clear.len() + subs.config.len();
        before != after
    }

    // Dispatch takes the handler list out of the message so handlers may
    // register new subscriptions; those land behind the existing ones.

    fn emit_element(&mut self, element: &StreamElement) {
        let mut handlers = std::mem::take(&mut self.subscribers.element);
        for (_, handler) in handlers.iter_mut() {
            handler(element);
        }
        let added = std::mem::replace(&mut self.subscribers.element, handlers);
        self.subscribers.element.extend(added);
    }

    fn emit_render(&mut self, html: &str) {
        let mut handlers = std::mem::take(&mut self.subscribers.render);
        for (_, handler) in handlers.iter_mut() {
            handler(html);
        }
        let added = std::mem::replace(&mut self.subscribers.render, handlers);
        self.subscribers.render.extend(added);
    }

    fn emit_clear(&mut self) {
        let mut handlers = std::mem::take(&mut self.subscribers.clear);
        for (_, handler) in handlers.iter_mut() {
            handler();
        }
        let added = std::mem::replace(&mut self.subscribers.clear, handlers);
        self.subscribers.clear.extend(added);
    }

    fn emit_config(&mut self, config: &MessageConfig) {
        let mut handlers = std::mem::take(&mut self.subscribers.config);
        for (_, handler) in handlers.iter_mut() {
            handler(config);
        }
        let added = std::mem::replace(&mut self.subscribers.config, handlers);
        self.subscribers.config.extend(added);
    }
}
