//! Pull-based reading of a message's element notifications.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use turbo_html::Element;

use crate::{ConfigPatch, SharedMessage, SubscriptionId};

/// A pull-based stream of rendered fragments fed by one message.
///
/// On creation the reader drains any already-buffered elements into its
/// queue in insertion order, clears the message, turns its buffering off,
/// and subscribes to the element notification; every element added from
/// then on arrives as one rendered fragment. Detaching (explicitly or on
/// drop) unsubscribes and turns buffering back on.
///
/// The internal queue is unbounded and sends no backpressure signal back to
/// the message - a known limitation, kept as an area for extension.
///
/// Attach at most one reader to a message at a time: the buffering flag is
/// shared mutable state and concurrent readers toggling it produce
/// undefined buffering. This precondition is documented, not enforced.
pub struct TurboReader {
    message: SharedMessage,
    sender: UnboundedSender<String>,
    receiver: UnboundedReceiver<String>,
    subscription: Option<SubscriptionId>,
}

impl TurboReader {
    /// Attach a reader to a message.
    ///
    /// Panics if the message is mutably borrowed (e.g. called from inside
    /// one of its notification handlers).
    pub fn new(message: &SharedMessage) -> Self {
        let (sender, receiver) = mpsc::unbounded();

        let subscription = {
            let mut msg = message.borrow_mut();

            if !msg.is_empty() {
                tracing::debug!(buffered = msg.len(), "draining pre-buffered elements");
                for element in msg.elements() {
                    let _ = sender.unbounded_send(element.render());
                }
                msg.clear();
            }

            msg.update_config(ConfigPatch::new().buffer(false));

            let queue = sender.clone();
            msg.on_element(move |element| {
                let _ = queue.unbounded_send(element.render());
            })
        };

        Self {
            message: message.clone(),
            sender,
            receiver,
            subscription: Some(subscription),
        }
    }

    /// A handle to the wrapped message.
    pub fn message(&self) -> SharedMessage {
        self.message.clone()
    }

    /// Signal end of input. Fragments already queued still drain; after
    /// that the stream ends. Elements added to the message afterwards are
    /// dropped.
    pub fn finish(&mut self) {
        tracing::debug!("reader finished");
        self.sender.close_channel();
    }

    /// Unsubscribe from the message and restore its buffering. Idempotent;
    /// also runs on drop.
    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            tracing::debug!("reader detached");
            let mut msg = self.message.borrow_mut();
            msg.unsubscribe(id);
            msg.update_config(ConfigPatch::new().buffer(true));
        }
    }
}

impl Stream for TurboReader {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for TurboReader {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TurboStream;
    use futures::executor::block_on;
    use futures::StreamExt;

    #[test]
    fn test_drains_pre_buffered_elements_in_order() {
        let message = TurboStream::new().into_shared();
        message
            .borrow_mut()
            .append("a", "1")
            .unwrap()
            .remove("b")
            .unwrap();

        let mut reader = TurboReader::new(&message);
        assert!(message.borrow().is_empty());

        reader.finish();
        let fragments: Vec<String> = block_on(reader.by_ref().collect());
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains(r#"target="a""#));
        assert!(fragments[1].contains(r#"target="b""#));
    }

    #[test]
    fn test_live_elements_flow_through() {
        let message = TurboStream::new().into_shared();
        let mut reader = TurboReader::new(&message);

        message.borrow_mut().append("a", "1").unwrap();
        // Buffering is off while the reader is attached.
        assert!(message.borrow().is_empty());
        assert!(!message.borrow().config().buffer);

        message.borrow_mut().remove("b").unwrap();
        reader.finish();

        let fragments: Vec<String> = block_on(reader.by_ref().collect());
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains(r#"action="append""#));
        assert!(fragments[1].contains(r#"action="remove""#));
    }

    #[test]
    fn test_detach_restores_buffering() {
        let message = TurboStream::new().into_shared();
        let mut reader = TurboReader::new(&message);
        assert!(!message.borrow().config().buffer);

        reader.detach();
        assert!(message.borrow().config().buffer);

        // Idempotent.
        reader.detach();
        assert!(message.borrow().config().buffer);

        // Elements are buffered again and no longer reach the reader.
        message.borrow_mut().append("a", "1").unwrap();
        assert_eq!(message.borrow().len(), 1);
    }

    #[test]
    fn test_drop_restores_buffering() {
        let message = TurboStream::new().into_shared();
        {
            let _reader = TurboReader::new(&message);
            assert!(!message.borrow().config().buffer);
        }
        assert!(message.borrow().config().buffer);
    }

    #[test]
    fn test_finish_ends_stream_after_queued_items() {
        let message = TurboStream::new().into_shared();
        let mut reader = TurboReader::new(&message);

        message.borrow_mut().append("a", "1").unwrap();
        reader.finish();
        message.borrow_mut().append("late", "2").unwrap();

        let fragments: Vec<String> = block_on(reader.by_ref().collect());
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].contains(r#"target="a""#));
    }

    #[test]
    fn test_snapshot_stream_is_finite() {
        let mut message = TurboStream::new();
        message.append("a", "1").unwrap().remove("b").unwrap();

        let lines: Vec<String> = block_on(message.snapshot_stream().collect());
        assert_eq!(lines.len(), 2);

        let mut empty = TurboStream::new();
        let lines: Vec<String> = block_on(empty.snapshot_stream().collect());
        assert!(lines.is_empty());
    }
}
