//! # Session Commands
//!
//! A shopper session is created when the storefront first loads in a tab.
//! Every cart, chat, loyalty and favorites route is scoped to one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub product_id: u32,
    pub favorite: bool,
    pub favorites: Vec<u32>,
}

/// `POST /api/sessions`
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions().create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// `DELETE /api/sessions/{sid}`
pub async fn end_session(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.sessions().remove(sid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/sessions/{sid}/favorites`
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<Vec<u32>>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.favorites()))
}

/// `POST /api/sessions/{sid}/favorites/{product_id}`
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path((sid, product_id)): Path<(Uuid, u32)>,
) -> ApiResult<Json<FavoriteToggled>> {
    debug!(session = %sid, product_id, "toggle_favorite command");
    let session = shopper(&state, sid).await?;
    let favorite = session.toggle_favorite(product_id)?;
    Ok(Json(FavoriteToggled {
        product_id,
        favorite,
        favorites: session.favorites(),
    }))
}
