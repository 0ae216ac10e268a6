//! Request classification by header inspection.

use http::header::ACCEPT;
use http::HeaderMap;
use turbo_html::TurboFrame;
use turbo_stream::TurboStream;

/// Whether the request negotiates for Turbo stream responses.
///
/// True iff the `Accept` header's media-type list contains
/// `text/vnd.turbo-stream.html`. Media-type parameters are ignored and the
/// comparison is ASCII case-insensitive. A missing or unreadable header
/// classifies as `false`.
pub fn is_stream_request(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT) else {
        return false;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };

    accept.split(',').any(|media| {
        media
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(TurboStream::MIME_TYPE))
    })
}

/// Whether the request was made by a Turbo frame, i.e. carries the
/// `turbo-frame` header.
pub fn is_frame_request(headers: &HeaderMap) -> bool {
    headers.contains_key(TurboFrame::HEADER_KEY)
}

/// The requesting frame's id: the literal value of the `turbo-frame`
/// header, or `None` if absent or unreadable.
pub fn frame_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(TurboFrame::HEADER_KEY)?.to_str().ok()
}
