//! Chirp handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::debug;
use uuid::Uuid;

use chirpy_core::chirps::validate_chirp;

use crate::AppState;
use crate::error::{AppError, AppJson, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpResponse, CreateChirpRequest, ListChirpsQuery};

/// Sort direction of `GET /api/chirps`. Anything but `desc` sorts oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

fn parse_chirp_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid chirp ID".into()))
}

/// `POST /api/chirps`: publish a chirp as the caller.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let cleaned = validate_chirp(&body.body)?;
    let chirp = state.store.create_chirp(user_id, &cleaned).await?;
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// `GET /api/chirps?author_id=&sort=`: list chirps ordered by creation time.
pub async fn list_chirps_handler(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> AppResult<Json<Vec<ChirpResponse>>> {
    let author = match query.author_id.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation("Invalid author ID".into()))?,
        ),
        None => None,
    };

    let mut chirps = state.store.list_chirps(author).await?;
    chirps.sort_by_key(|c| c.created_at);
    if SortOrder::parse(query.sort.as_deref()) == SortOrder::Desc {
        chirps.reverse();
    }

    Ok(Json(chirps.into_iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{chirp_id}`
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    let chirp_id = parse_chirp_id(&chirp_id)?;
    let chirp = state
        .store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chirp not found".into()))?;
    Ok(Json(chirp.into()))
}

/// `DELETE /api/chirps/{chirp_id}`: delete one of the caller's chirps.
///
/// A missing chirp and someone else's chirp both answer 403.
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> AppResult<StatusCode> {
    let chirp_id = parse_chirp_id(&chirp_id)?;
    if state.store.delete_chirp(chirp_id, user_id).await? == 0 {
        debug!(%chirp_id, %user_id, "chirp delete refused");
        return Err(AppError::Forbidden("Forbidden".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_desc_sorts_descending() {
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }
}
