//! Server-sent event framing for Turbo messages.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use turbo_html::{Attributes, ValidationError};
use turbo_stream::{SharedMessage, TurboReader, TurboStream};

/// Frame a rendered fragment as one SSE message: each line prefixed
/// `data: `, an optional leading `event:` line, terminated by a blank line.
fn frame_event(event_name: Option<&str>, raw: &str) -> String {
    let data = raw
        .split('\n')
        .map(|line| format!("data: {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    match event_name {
        Some(name) => format!("event: {name}\n{data}\n\n"),
        None => format!("{data}\n\n"),
    }
}

/// A Turbo stream message framed for server-sent events.
///
/// Wraps a [`TurboStream`] and renders it with SSE syntax, optionally under
/// a named event. Use [`into_reader`](Self::into_reader) to pipe elements
/// continuously into an open event-stream response.
#[derive(Debug, Default)]
pub struct SseStream {
    message: TurboStream,
    event_name: Option<String>,
}

impl SseStream {
    /// MIME type of an SSE response.
    pub const MIME_TYPE: &'static str = "text/event-stream";

    /// Create an SSE message without an event name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an SSE message sent under a named event.
    pub fn with_event(event_name: impl Into<String>) -> Self {
        Self {
            message: TurboStream::new(),
            event_name: Some(event_name.into()),
        }
    }

    /// Set the event name. Chainable.
    pub fn event(&mut self, event_name: impl Into<String>) -> &mut Self {
        self.event_name = Some(event_name.into());
        self
    }

    /// The wrapped message.
    pub fn message(&self) -> &TurboStream {
        &self.message
    }

    /// Mutable access to the wrapped message for adding elements.
    pub fn message_mut(&mut self) -> &mut TurboStream {
        &mut self.message
    }

    /// Convenience: add an element to the wrapped message.
    pub fn add_element(
        &mut self,
        attributes: Attributes,
        content: impl Into<String>,
    ) -> Result<&mut Self, ValidationError> {
        self.message.add_element(attributes, content)?;
        Ok(self)
    }

    /// Render the message as one SSE event, or `None` when the buffer is
    /// empty.
    pub fn render(&mut self) -> Option<String> {
        let html = self.message.render()?;
        Some(frame_event(self.event_name.as_deref(), &html))
    }

    /// Frame any raw fragment with this message's SSE syntax.
    pub fn render_event(&self, raw: &str) -> String {
        frame_event(self.event_name.as_deref(), raw)
    }

    /// Convert into a continuous SSE reader plus a handle to the shared
    /// message for adding further elements.
    ///
    /// Pre-buffered elements are drained as individual events first; each
    /// element added through the handle afterwards arrives as one framed
    /// event.
    pub fn into_reader(self) -> (SseReader, SharedMessage) {
        let Self {
            message,
            event_name,
        } = self;
        let shared = message.into_shared();
        let reader = TurboReader::new(&shared);
        (SseReader { reader, event_name }, shared)
    }

    /// An `http` response builder preloaded with the event-stream headers.
    pub fn response_builder() -> http::response::Builder {
        http::Response::builder()
            .header(CONTENT_TYPE, Self::MIME_TYPE)
            .header(CACHE_CONTROL, "no-cache")
            .header(CONNECTION, "keep-alive")
    }
}

/// A continuous pull-based stream of SSE-framed fragments.
///
/// Same lifecycle as [`TurboReader`]: attaching disables the message's
/// buffering, dropping or detaching restores it.
pub struct SseReader {
    reader: TurboReader,
    event_name: Option<String>,
}

impl SseReader {
    /// Signal end of input; queued events still drain.
    pub fn finish(&mut self) {
        self.reader.finish();
    }

    /// Unsubscribe and restore the message's buffering. Idempotent.
    pub fn detach(&mut self) {
        self.reader.detach();
    }
}

impl Stream for SseReader {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.reader).poll_next(cx) {
            Poll::Ready(Some(fragment)) => {
                Poll::Ready(Some(frame_event(self.event_name.as_deref(), &fragment)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::StreamExt;

    #[test]
    fn test_render_frames_data_lines() {
        let mut sse = SseStream::new();
        sse.message_mut().append("t", "<p>x</p>").unwrap();
        assert_eq!(
            sse.render().as_deref(),
            Some("data: <turbo-stream action=\"append\" target=\"t\"><template><p>x</p></template></turbo-stream>\n\n")
        );
    }

    #[test]
    fn test_render_with_event_name() {
        let mut sse = SseStream::with_event("updates");
        sse.message_mut().remove("t").unwrap();
        let event = sse.render().unwrap();
        assert!(event.starts_with("event: updates\n"));
        assert!(event.ends_with("\n\n"));
    }

    #[test]
    fn test_multi_line_fragments_get_one_data_prefix_per_line() {
        let mut sse = SseStream::new();
        sse.message_mut()
            .append("a", "1")
            .unwrap()
            .remove("b")
            .unwrap();
        let event = sse.render().unwrap();
        assert_eq!(event.matches("data: ").count(), 2);
        assert!(event.ends_with("\n\n"));
    }

    #[test]
    fn test_render_empty_is_sentinel() {
        let mut sse = SseStream::new();
        assert_eq!(sse.render(), None);
    }

    #[test]
    fn test_event_setter_chains() {
        let mut sse = SseStream::new();
        sse.event("updates").message_mut().refresh().unwrap();
        assert!(sse.render().unwrap().starts_with("event: updates\n"));
    }

    #[test]
    fn test_reader_frames_each_element() {
        let sse = SseStream::with_event("updates");
        let (mut reader, message) = sse.into_reader();

        message.borrow_mut().append("t", "x").unwrap();
        reader.finish();

        let events: Vec<String> = block_on(reader.by_ref().collect());
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("event: updates\ndata: <turbo-stream"));
        assert!(events[0].ends_with("\n\n"));
    }

    #[test]
    fn test_reader_restores_buffering_on_drop() {
        let (reader, message) = SseStream::new().into_reader();
        assert!(!message.borrow().config().buffer);
        drop(reader);
        assert!(message.borrow().config().buffer);
    }

    #[test]
    fn test_response_builder_headers() {
        let response = SseStream::response_builder().body(()).unwrap();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            SseStream::MIME_TYPE
        );
        assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-cache");
        assert_eq!(response.headers().get(CONNECTION).unwrap(), "keep-alive");
    }
}
