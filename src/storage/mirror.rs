//! Mirror-source fetching
//!
//! A write request may name a remote URL whose content is stored instead of
//! the request body. The fetch is a plain GET with the shared client; the
//! upstream status is not inspected, only transport failures count as
//! fetch errors. Everything after the request is sent (chunk reads, file
//! writes) is a stream-write failure.

use crate::error::ApiError;
use std::io;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Stream the body of `source` into `file`. Returns the number of bytes
/// written.
pub async fn fetch_into(
    client: &reqwest::Client,
    source: &str,
    file: &mut File,
) -> Result<u64, ApiError> {
    let mut response = client
        .get(source)
        .send()
        .await
        .map_err(ApiError::MirrorFetch)?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ApiError::MirrorWrite(io::Error::other(e)))?
    {
        file.write_all(&chunk)
            .await
            .map_err(ApiError::MirrorWrite)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(ApiError::MirrorWrite)?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_into_writes_remote_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payload.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mirrored bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut file = File::create(&target).await.unwrap();

        let client = reqwest::Client::new();
        let written = fetch_into(&client, &format!("{}/payload.bin", server.uri()), &mut file)
            .await
            .unwrap();
        assert_eq!(written, 14);
        drop(file);

        let mut stored = Vec::new();
        File::open(&target)
            .await
            .unwrap()
            .read_to_end(&mut stored)
            .await
            .unwrap();
        assert_eq!(stored, b"mirrored bytes");
    }

    #[tokio::test]
    async fn test_unreachable_source_is_a_fetch_failure() {
        // Nothing listens on the reserved port; connect fails before any
        // byte is transferred.
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("out.bin")).await.unwrap();

        let client = reqwest::Client::new();
        let err = fetch_into(&client, "http://127.0.0.1:1/gone", &mut file)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MirrorFetch(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_stored_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_bytes(b"not here".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut file = File::create(&target).await.unwrap();

        let client = reqwest::Client::new();
        let written = fetch_into(&client, &format!("{}/missing", server.uri()), &mut file)
            .await
            .unwrap();
        assert_eq!(written, 8);
    }
}
