use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::SweepResponse;
use crate::domain::{EventId, EventState};

fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(token) = state.config.server.admin_token.as_deref() else {
        return false;
    };

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        == Some(token)
}

async fn change_state(
    state: Arc<AppState>,
    headers: HeaderMap,
    event_id: EventId,
    new_state: EventState,
) -> axum::response::Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.service.set_event_state(event_id, new_state) {
        Ok(report) => {
            log::info!("Admin set event {} to {}", event_id, new_state.as_str());
            Json(SweepResponse::from(report)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn lock_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    headers: HeaderMap,
) -> impl IntoResponse {
    change_state(state, headers, event_id, EventState::Locked).await
}

pub async fn unlock_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    headers: HeaderMap,
) -> impl IntoResponse {
    change_state(state, headers, event_id, EventState::Open).await
}
