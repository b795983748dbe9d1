// Request handling module entry point
// Method dispatch, the two route handlers, and the middleware wrappers

pub mod read;
pub mod router;
pub mod write;

use crate::http::ResponseBody;
use hyper::Response;

pub use router::handle_request;

/// Tagged handler result.
///
/// The dispatcher branches on the tag: `Empty` and `Json` are wrapped in
/// the response envelope, `Stream` is an already-built binary response
/// that must pass through untouched.
pub enum Outcome {
    /// Success with no payload
    Empty,
    /// Success with a JSON payload for the envelope's `result` field
    Json(serde_json::Value),
    /// Binary response built by the handler; bypasses the envelope
    Stream(Response<ResponseBody>),
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Stream(response) => f
                .debug_tuple("Stream")
                .field(&response.status())
                .finish(),
        }
    }
}
