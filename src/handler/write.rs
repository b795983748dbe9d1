//! Create-only upload handler
//!
//! `PUT <path>[?MirrorSource=<url>]` stores the request body (or the mirror
//! source's body) at the resolved path. Writes never overwrite: the target
//! is created with an exclusive create, which is what holds the
//! at-most-once-creation invariant under concurrent writers. The stat
//! before it is only a fast-path refusal.

use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::Outcome;
use crate::logger;
use crate::storage::{self, mirror};
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Request, Uri};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

pub async fn handle_put<B>(req: Request<B>, state: Arc<AppState>) -> Result<Outcome, ApiError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    // Test mode is a pure sink: drain the body, touch nothing.
    if state.config.storage.test_mode {
        drain(req.into_body()).await;
        return Ok(Outcome::Empty);
    }

    let target = storage::resolve(&state.root, req.uri().path())?;
    let mirror_source = mirror_source(req.uri());

    if fs::metadata(&target).await.is_ok() {
        return Err(ApiError::AlreadyExists);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(ApiError::CreateDir)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ApiError::AlreadyExists,
            _ => ApiError::CreateFile(e),
        })?;

    // When mirroring, the request body is ignored entirely.
    let written = match mirror_source {
        Some(source) => mirror::fetch_into(&state.http_client, &source, &mut file).await,
        None => copy_body(req.into_body(), &mut file).await,
    };

    if let Err(err) = written {
        // Remove the partial target so the path stays retryable under the
        // create-only semantics.
        drop(file);
        if let Err(cleanup) = fs::remove_file(&target).await {
            logger::log_warning(&format!("unable to remove partial upload: {cleanup}"));
        }
        return Err(err);
    }

    Ok(Outcome::Empty)
}

/// Extract a non-empty `MirrorSource` query parameter.
fn mirror_source(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "MirrorSource")
        .map(|(_, value)| value.into_owned())
        .filter(|source| !source.is_empty())
}

/// Stream request body frames into the file. Returns bytes written.
async fn copy_body<B>(mut body: B, file: &mut File) -> Result<u64, ApiError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let mut written = 0u64;
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| ApiError::WriteBody(e.to_string()))?;
        if let Ok(data) = frame.into_data() {
            file.write_all(&data)
                .await
                .map_err(|e| ApiError::WriteBody(e.to_string()))?;
            written += data.len() as u64;
        }
    }
    file.flush()
        .await
        .map_err(|e| ApiError::WriteBody(e.to_string()))?;
    Ok(written)
}

/// Read and discard the body.
async fn drain<B>(mut body: B)
where
    B: Body<Data = Bytes> + Unpin,
{
    while let Some(frame) = body.frame().await {
        if frame.is_err() {
            break;
        }
    }
}
