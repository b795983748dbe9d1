//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Every request passes through
//! the access-log wrapper (outermost) and the recovery wrapper (innermost)
//! before reaching the verb handler; the tagged outcome is then either
//! wrapped in the JSON envelope or, for binary streams, passed through
//! untouched.

use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::{read, write, Outcome};
use crate::http::{self, Envelope, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: std::fmt::Display + Send,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);

    let outcome = recover(dispatch(req, Arc::clone(&state))).await;

    let (response, error) = match outcome {
        Ok(outcome) => (respond(outcome), None),
        Err(err) => {
            let message = err.to_string();
            let response = http::envelope_response(err.status(), &Envelope::error(message.as_str()));
            (response, Some(message))
        }
    };

    entry.status = response.status().as_u16();
    entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry.error = error;

    // Failed requests are always logged; successes honor the access-log
    // toggle.
    if state.config.logging.access_log || entry.error.is_some() {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route by method; everything but PUT and GET is refused.
async fn dispatch<B>(req: Request<B>, state: Arc<AppState>) -> Result<Outcome, ApiError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    match *req.method() {
        Method::PUT => write::handle_put(req, state).await,
        Method::GET => read::handle_get(req, state).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Recovery boundary: run the handler in its own task so an uncaught panic
/// cannot escape; a faulted handler becomes the fixed internal error.
async fn recover<F>(handler: F) -> Result<Outcome, ApiError>
where
    F: Future<Output = Result<Outcome, ApiError>> + Send + 'static,
{
    match tokio::spawn(handler).await {
        Ok(outcome) => outcome,
        Err(fault) => {
            logger::log_error(&format!("recovered from handler fault: {fault}"));
            Err(ApiError::Internal)
        }
    }
}

/// Convert a tagged outcome into the wire response.
fn respond(outcome: Outcome) -> Response<ResponseBody> {
    match outcome {
        // A payload-free success is just the status line; only results and
        // errors are enveloped.
        Outcome::Empty => http::empty_response(StatusCode::OK),
        Outcome::Json(result) => {
            http::envelope_response(StatusCode::OK, &Envelope::ok_with(result))
        }
        // Already built by the handler; no envelope, no header mutation.
        Outcome::Stream(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Full};
    use tempfile::TempDir;

    fn state_for(dir: &TempDir) -> Arc<AppState> {
        let mut config = Config::default();
        config.storage.root_dir = dir.path().to_string_lossy().into_owned();
        Arc::new(AppState::new(&config))
    }

    fn request(method: Method, path: &str, body: impl Into<Bytes>) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(body.into()))
            .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    async fn envelope_of(response: Response<ResponseBody>) -> Envelope {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let response = handle_request(
            request(Method::PUT, "/spool/frame.bin", &b"round trip"[..]),
            Arc::clone(&state),
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());

        let response = handle_request(
            request(Method::GET, "/spool/frame.bin", &b""[..]),
            state,
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            http::CONTENT_TYPE_OCTET_STREAM
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"round trip");
    }

    #[tokio::test]
    async fn test_directory_listing_is_enveloped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let state = state_for(&dir);

        let response = handle_request(request(Method::GET, "/", &b""[..]), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            http::CONTENT_TYPE_JSON
        );
        let envelope = envelope_of(response).await;
        assert!(envelope.ok);
        assert_eq!(envelope.result, Some(serde_json::json!(["a.txt"])));
    }

    #[tokio::test]
    async fn test_inaccessible_path_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let response = handle_request(request(Method::GET, "/missing", &b""[..]), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let envelope = envelope_of(response).await;
        assert!(!envelope.ok);
        assert_eq!(envelope.error, Some("unable to access path".to_string()));
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden_for_both_verbs() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        for method in [Method::PUT, Method::GET] {
            let response = handle_request(
                request(method, "/../escape", &b"x"[..]),
                Arc::clone(&state),
                peer(),
            )
            .await
            .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            let envelope = envelope_of(response).await;
            assert_eq!(envelope.error, Some("disallowed path".to_string()));
        }
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_other_methods_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(&dir);

        let response = handle_request(request(Method::POST, "/x", &b""[..]), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let envelope = envelope_of(response).await;
        assert_eq!(envelope.error, Some("method not allowed".to_string()));
    }

    #[tokio::test]
    async fn test_existing_target_maps_to_405() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("taken.bin"), b"first").unwrap();
        let state = state_for(&dir);

        let response = handle_request(
            request(Method::PUT, "/taken.bin", &b"second"[..]),
            state,
            peer(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let envelope = envelope_of(response).await;
        assert_eq!(envelope.error, Some("file already exists".to_string()));
    }

    #[tokio::test]
    async fn test_recover_converts_panics_to_internal_error() {
        let err = recover(async { panic!("handler blew up") })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal server error");
    }

    #[tokio::test]
    async fn test_recover_passes_results_through() {
        let outcome = recover(async { Ok(Outcome::Empty) }).await.unwrap();
        assert!(matches!(outcome, Outcome::Empty));

        let err = recover(async { Err(ApiError::DisallowedPath) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DisallowedPath));
    }
}
