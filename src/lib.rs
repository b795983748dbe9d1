//! HTTP data server
//!
//! A minimal network file store used as a data-landing endpoint: producers
//! PUT binary payloads under virtual paths, consumers GET them back or list
//! directories. Writes are create-only and may be mirrored from a remote
//! URL instead of the request body.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;

pub use error::ApiError;
