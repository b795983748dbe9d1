//! Read handler
//!
//! `GET <path>` serves a file's raw bytes or lists a directory's immediate
//! children, decided by a stat on the resolved path. Stat failures are
//! reported uniformly so clients cannot probe the filesystem layout.

use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::Outcome;
use crate::http;
use crate::storage;
use hyper::Request;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

pub async fn handle_get<B>(req: Request<B>, state: Arc<AppState>) -> Result<Outcome, ApiError> {
    let target = storage::resolve(&state.root, req.uri().path())?;

    // Deliberately uniform: not-found and permission-denied look the same.
    let metadata = fs::metadata(&target)
        .await
        .map_err(|_| ApiError::Inaccessible)?;

    if metadata.is_dir() {
        list_directory(&target).await
    } else {
        serve_file(&target).await
    }
}

/// Enumerate immediate children in filesystem order; subdirectories get a
/// trailing separator so the flat name list still carries the type.
async fn list_directory(path: &Path) -> Result<Outcome, ApiError> {
    let mut dir = fs::read_dir(path).await.map_err(ApiError::ListDir)?;

    let mut names = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(ApiError::ListDir)? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.map_err(ApiError::ListDir)?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }

    Ok(Outcome::Json(serde_json::Value::from(names)))
}

async fn serve_file(path: &Path) -> Result<Outcome, ApiError> {
    let file = fs::File::open(path).await.map_err(ApiError::OpenFile)?;
    Ok(Outcome::Stream(http::file_stream_response(file)))
}
