//! The transport bridge capability interface.

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response};
use turbo_html::{Element, TurboFrame};
use turbo_stream::TurboStream;

use crate::request;

/// Capabilities a transport must provide to host Turbo responses.
///
/// A bridge is an explicit adapter value the host application composes with
/// its framework of choice; it replaces ad-hoc extension of shared
/// request/response objects.
pub trait TransportBridge<Req, Res> {
    /// Whether the request negotiates for Turbo stream responses.
    fn is_stream_request(&self, request: &Req) -> bool;

    /// Whether the request was made by a Turbo frame.
    fn is_frame_request(&self, request: &Req) -> bool;

    /// The requesting frame's id, if any.
    fn frame_id<'a>(&self, request: &'a Req) -> Option<&'a str>;

    /// Render a message into a stream response with the stream MIME type.
    fn build_stream(&self, message: &mut TurboStream) -> Res;

    /// Render a frame into a frame response with the frame MIME type.
    fn build_frame(&self, frame: &TurboFrame) -> Res;
}

/// Bridge over the `http` crate's request/response types.
///
/// Works with any framework exposing `http::Request`/`http::Response`
/// (hyper, axum extractors, test doubles).
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpBridge;

impl HttpBridge {
    /// Create the bridge.
    pub fn new() -> Self {
        Self
    }
}

impl<B> TransportBridge<Request<B>, Response<String>> for HttpBridge {
    fn is_stream_request(&self, request: &Request<B>) -> bool {
        request::is_stream_request(request.headers())
    }

    fn is_frame_request(&self, request: &Request<B>) -> bool {
        request::is_frame_request(request.headers())
    }

    fn frame_id<'a>(&self, request: &'a Request<B>) -> Option<&'a str> {
        request::frame_id(request.headers())
    }

    fn build_stream(&self, message: &mut TurboStream) -> Response<String> {
        // The empty sentinel becomes an empty body; the content type still
        // marks the response as a stream.
        let body = message.render().unwrap_or_default();
        let mut response = Response::new(body);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(TurboStream::MIME_TYPE));
        response
    }

    fn build_frame(&self, frame: &TurboFrame) -> Response<String> {
        let mut response = Response::new(frame.render());
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(TurboFrame::MIME_TYPE));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_request() -> Request<()> {
        Request::builder()
            .header("accept", "text/vnd.turbo-stream.html")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_classification_delegates_to_headers() {
        let bridge = HttpBridge::new();
        assert!(bridge.is_stream_request(&stream_request()));

        let frame_request = Request::builder()
            .header("turbo-frame", "sidebar")
            .body(())
            .unwrap();
        assert!(!bridge.is_stream_request(&frame_request));
        assert!(bridge.is_frame_request(&frame_request));
        assert_eq!(bridge.frame_id(&frame_request), Some("sidebar"));
    }

    #[test]
    fn test_build_stream_response() {
        let bridge = HttpBridge::new();
        let mut message = TurboStream::new();
        message.append("t", "<p>x</p>").unwrap();

        let response = TransportBridge::<Request<()>, _>::build_stream(&bridge, &mut message);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            TurboStream::MIME_TYPE
        );
        assert!(response.body().contains(r#"action="append""#));
    }

    #[test]
    fn test_build_stream_response_empty_message() {
        let bridge = HttpBridge::new();
        let mut message = TurboStream::new();
        let response = TransportBridge::<Request<()>, _>::build_stream(&bridge, &mut message);
        assert_eq!(response.body(), "");
    }

    #[test]
    fn test_build_frame_response() {
        let bridge = HttpBridge::new();
        let frame = TurboFrame::new("sidebar", "<p>x</p>").unwrap();
        let response = TransportBridge::<Request<()>, _>::build_frame(&bridge, &frame);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            TurboFrame::MIME_TYPE
        );
        assert_eq!(
            response.body(),
            r#"<turbo-frame id="sidebar"><p>x</p></turbo-frame>"#
        );
    }
}
