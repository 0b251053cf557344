//! Polka payment webhook.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppJson, AppResult};
use crate::models::PolkaWebhookRequest;

/// The only event that changes state.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// `POST /api/polka/webhooks`: mark a user as Chirpy Red.
///
/// Runs behind `require_api_key`. Any other event is acknowledged and ignored.
pub async fn webhook_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<PolkaWebhookRequest>,
) -> AppResult<StatusCode> {
    if body.event != USER_UPGRADED_EVENT {
        debug!(event = %body.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let data = body
        .data
        .ok_or_else(|| AppError::Validation("Missing data.user_id".into()))?;
    let user_id = Uuid::parse_str(&data.user_id)
        .map_err(|_| AppError::Validation("Invalid data.user_id".into()))?;

    state
        .store
        .upgrade_user_to_red(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(%user_id, "user upgraded to chirpy red");
    Ok(StatusCode::NO_CONTENT)
}
