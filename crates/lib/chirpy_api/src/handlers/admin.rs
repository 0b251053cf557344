//! Admin endpoints: visit metrics and development reset.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::response::Html;
use tracing::{info, warn};

use crate::AppState;
use crate::config::Platform;
use crate::error::{AppError, AppResult};

/// `GET /admin/metrics`: file server hit count as an HTML page.
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    let hits = state.fileserver_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {hits} times!</p>
  </body>
</html>"
    ))
}

/// `POST /admin/reset`: delete every user (with their sessions and chirps) and
/// zero the hit counter. Only available on the dev platform.
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<&'static str> {
    if state.config.platform != Platform::Dev {
        warn!("reset refused outside dev platform");
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".into(),
        ));
    }

    let removed = state.store.delete_all_users().await?;
    state.fileserver_hits.store(0, Ordering::Relaxed);

    info!(removed, "store reset");
    Ok("OK")
}
