//! Fan-out of Turbo messages to a persistent socket.

use std::cell::Cell;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedSender;
use turbo_html::Element;
use turbo_stream::{ConfigPatch, SharedMessage, SubscriptionId, TurboStream};

/// Forwards a message's output into a socket send queue.
///
/// The transmit handle is an unbounded sender; the host drains the matching
/// receiver into its actual socket (WebSocket, TCP, test double). Two modes,
/// tracking the message's `buffer` config live:
/// - buffered (config default): whole rendered messages are forwarded on
///   [`render`](TurboStream::render)/[`flush`](TurboStream::flush);
/// - eager (`buffer = false`): each element is forwarded individually as it
///   is added.
///
/// Both notification handlers stay registered and consult a shared mode
/// flag, so flipping the config mid-stream needs no re-subscription.
pub struct SocketStream {
    message: SharedMessage,
    subscriptions: Vec<SubscriptionId>,
}

impl SocketStream {
    /// Create a socket stream around a fresh message in buffered mode.
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self::attach(&TurboStream::new().into_shared(), sender)
    }

    /// Create a socket stream around a fresh message in eager mode: every
    /// added element is sent immediately and nothing is retained.
    pub fn eager(sender: UnboundedSender<String>) -> Self {
        let stream = Self::new(sender);
        stream
            .message
            .borrow_mut()
            .update_config(ConfigPatch::new().buffer(false));
        stream
    }

    /// Attach to an existing shared message, respecting its current config.
    pub fn attach(message: &SharedMessage, sender: UnboundedSender<String>) -> Self {
        let buffering = Rc::new(Cell::new(message.borrow().config().buffer));
        let mut subscriptions = Vec::with_capacity(3);

        {
            let mut msg = message.borrow_mut();

            let mode = buffering.clone();
            subscriptions.push(msg.on_config(move |config| mode.set(config.buffer)));

            let mode = buffering.clone();
            let tx = sender.clone();
            subscriptions.push(msg.on_element(move |element| {
                if !mode.get() {
                    let _ = tx.unbounded_send(element.render());
                }
            }));

            let mode = buffering;
            let tx = sender;
            subscriptions.push(msg.on_render(move |html| {
                if mode.get() {
                    let _ = tx.unbounded_send(html.to_owned());
                }
            }));
        }

        Self {
            message: message.clone(),
            subscriptions,
        }
    }

    /// A handle to the wrapped message for adding elements.
    pub fn message(&self) -> SharedMessage {
        self.message.clone()
    }

    /// Stop forwarding. Idempotent; also runs on drop.
    pub fn detach(&mut self) {
        if !self.subscriptions.is_empty() {
            tracing::debug!("socket stream detached");
        }
        let mut msg = self.message.borrow_mut();
        for id in self.subscriptions.drain(..) {
            msg.unsubscribe(id);
        }
    }
}

impl Drop for SocketStream {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::StreamExt;

    #[test]
    fn test_buffered_mode_forwards_on_render() {
        let (tx, mut rx) = mpsc::unbounded();
        let socket = SocketStream::new(tx);
        let message = socket.message();

        message.borrow_mut().append("a", "1").unwrap();
        // Nothing forwarded until the message renders.
        assert!(rx.try_next().is_err());

        message.borrow_mut().flush();
        let sent = rx.try_next().unwrap().unwrap();
        assert!(sent.contains(r#"action="append""#));
    }

    #[test]
    fn test_eager_mode_forwards_each_element() {
        let (tx, mut rx) = mpsc::unbounded();
        let socket = SocketStream::eager(tx);
        let message = socket.message();

        message.borrow_mut().append("a", "1").unwrap();
        message.borrow_mut().remove("b").unwrap();

        let first = rx.try_next().unwrap().unwrap();
        let second = rx.try_next().unwrap().unwrap();
        assert!(first.contains(r#"target="a""#));
        assert!(second.contains(r#"target="b""#));

        // Eager messages retain nothing.
        assert!(message.borrow().is_empty());
    }

    #[test]
    fn test_mode_follows_config_changes() {
        let (tx, mut rx) = mpsc::unbounded();
        let socket = SocketStream::new(tx);
        let message = socket.message();

        message
            .borrow_mut()
            .update_config(ConfigPatch::new().buffer(false));
        message.borrow_mut().append("a", "1").unwrap();
        assert!(rx.try_next().unwrap().is_some());

        message
            .borrow_mut()
            .update_config(ConfigPatch::new().buffer(true));
        message.borrow_mut().append("b", "2").unwrap();
        assert!(rx.try_next().is_err());
        message.borrow_mut().flush();
        assert!(rx.try_next().unwrap().is_some());
    }

    #[test]
    fn test_detach_stops_forwarding() {
        let (tx, mut rx) = mpsc::unbounded();
        let mut socket = SocketStream::eager(tx);
        let message = socket.message();

        socket.detach();
        socket.detach();
        message.borrow_mut().append("a", "1").unwrap();
        assert!(rx.try_next().is_err());
    }

    #[tokio::test]
    async fn test_receiver_drains_asynchronously() {
        let (tx, mut rx) = mpsc::unbounded();
        let socket = SocketStream::eager(tx);
        let message = socket.message();

        message.borrow_mut().refresh().unwrap();
        drop(socket);
        drop(message);

        let sent = rx.next().await.unwrap();
        assert_eq!(sent, r#"<turbo-stream action="refresh"></turbo-stream>"#);
        assert_eq!(rx.next().await, None);
    }
}
