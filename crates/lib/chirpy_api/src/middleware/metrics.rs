//! File server hit counting.

use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Axum middleware: counts every request that reaches the static file server.
pub async fn count_fileserver_hits(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    next.run(request).await
}
