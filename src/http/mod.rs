//! HTTP protocol layer module
//!
//! The response envelope and response builders, decoupled from the route
//! handlers that produce them.

pub mod envelope;
pub mod response;

pub use envelope::Envelope;
pub use response::{
    empty_response, envelope_response, file_stream_response, full_body, ResponseBody,
    CONTENT_TYPE_JSON, CONTENT_TYPE_OCTET_STREAM,
};
