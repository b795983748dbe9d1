//! Request error taxonomy
//!
//! Every handler failure is one of these variants; the dispatcher maps the
//! variant to an HTTP status and puts the display string into the response
//! envelope. Causes are kept as sources so server-side logs stay useful.

use hyper::StatusCode;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("disallowed path")]
    DisallowedPath,

    #[error("unable to access path")]
    Inaccessible,

    #[error("file already exists")]
    AlreadyExists,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unable to create directory: {0}")]
    CreateDir(#[source] io::Error),

    #[error("unable to create file: {0}")]
    CreateFile(#[source] io::Error),

    #[error("unable to open file: {0}")]
    OpenFile(#[source] io::Error),

    #[error("unable to list directory: {0}")]
    ListDir(#[source] io::Error),

    #[error("unable to retrieve file: {0}")]
    MirrorFetch(#[source] reqwest::Error),

    #[error("unable to write file: {0}")]
    MirrorWrite(#[source] io::Error),

    #[error("unable to write file: {0}")]
    WriteBody(String),

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status the variant surfaces as.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::DisallowedPath
            | Self::Inaccessible
            | Self::CreateDir(_)
            | Self::CreateFile(_)
            | Self::OpenFile(_)
            | Self::ListDir(_) => StatusCode::FORBIDDEN,
            Self::AlreadyExists | Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MirrorFetch(_) => StatusCode::NOT_FOUND,
            Self::WriteBody(_) => StatusCode::BAD_REQUEST,
            Self::MirrorWrite(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
