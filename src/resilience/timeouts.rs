//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the wait for the backend's response headers
//! - Bound the gap between two body chunks once streaming has started
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Header timeouts surface as 504 Gateway Timeout; idle timeouts abort the stream

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use futures_util::{Stream, StreamExt};

use crate::relay::error::{RelayError, UnreachableCause};

/// Await the backend's response, giving up after `limit`.
pub async fn response_within<F, T>(limit: Duration, response: F) -> Result<T, UnreachableCause>
where
    F: Future<Output = Result<T, hyper_util::client::legacy::Error>>,
{
    match tokio::time::timeout(limit, response).await {
        Ok(Ok(res)) => Ok(res),
        Ok(Err(e)) => Err(UnreachableCause::Transport(e)),
        Err(_) => Err(UnreachableCause::Timeout(limit)),
    }
}

/// Pull the next chunk from `chunks`, failing if none arrives within `idle`.
///
/// Returns `None` once the stream is exhausted.
pub async fn next_within<S, E>(idle: Duration, chunks: &mut S) -> Option<Result<Bytes, RelayError>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    match tokio::time::timeout(idle, chunks.next()).await {
        Ok(Some(Ok(chunk))) => Some(Ok(chunk)),
        Ok(Some(Err(e))) => Some(Err(RelayError::StreamInterrupted(e.to_string()))),
        Ok(None) => None,
        Err(_) => Some(Err(RelayError::StreamInterrupted(format!(
            "no data from backend for {:?}",
            idle
        )))),
    }
}
