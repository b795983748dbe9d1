//! HTTP response building
//!
//! Builders for the two response shapes the server produces: a JSON-encoded
//! envelope and a raw octet-stream file body. Builder failures never
//! propagate to the client; they are logged and degrade to an empty body.

use crate::http::envelope::Envelope;
use crate::logger;
use futures_util::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use tokio_util::io::ReaderStream;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Unified body type: buffered envelope bodies and streamed file bodies
/// behind one boxed trait object.
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Wrap buffered bytes as a `ResponseBody`.
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Build a bodyless response carrying only the status line.
pub fn empty_response(status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .body(full_body(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("failed to build empty response: {e}"));
            Response::new(full_body(Bytes::new()))
        })
}

/// Build an envelope response with the given status.
///
/// An encoding failure is logged server-side only; the client still gets
/// the status line, with an empty body.
pub fn envelope_response(status: StatusCode, envelope: &Envelope) -> Response<ResponseBody> {
    let body = match serde_json::to_vec(envelope) {
        Ok(json) => full_body(json),
        Err(e) => {
            logger::log_error(&format!("unable to encode JSON envelope: {e}"));
            full_body(Bytes::new())
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(body)
        .unwrap_or_else(|e| {
            logger::log_error(&format!("failed to build envelope response: {e}"));
            Response::new(full_body(Bytes::new()))
        })
}

/// Build a `200 OK` response streaming the file's bytes.
///
/// The copy is best-effort: an I/O error mid-stream aborts the connection
/// and shows up in the connection log, not in the response.
pub fn file_stream_response(file: tokio::fs::File) -> Response<ResponseBody> {
    let stream = ReaderStream::new(file);
    let body = StreamBody::new(stream.map_ok(Frame::data)).boxed();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", CONTENT_TYPE_OCTET_STREAM)
        .body(body)
        .unwrap_or_else(|e| {
            logger::log_error(&format!("failed to build file response: {e}"));
            Response::new(full_body(Bytes::new()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_envelope_response_sets_json_content_type() {
        let response = envelope_response(StatusCode::OK, &Envelope::ok());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            CONTENT_TYPE_JSON
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_file_stream_response_carries_file_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"\x00\x01binary payload\xff").unwrap();

        let file = tokio::fs::File::open(tmp.path()).await.unwrap();
        let response = file_stream_response(file);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            CONTENT_TYPE_OCTET_STREAM
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"\x00\x01binary payload\xff");
    }
}
