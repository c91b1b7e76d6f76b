use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{FixtureItem, FixtureParams};
use crate::domain::{EventId, Pool};

pub async fn get_championship(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.service.championship_table() {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_event_standings(
    State(state): State<Arc<AppState>>,
    Path((event_id, pool)): Path<(EventId, String)>,
) -> impl IntoResponse {
    let outcome = pool
        .parse::<Pool>()
        .map_err(anyhow::Error::from)
        .and_then(|pool| state.service.current_standings(event_id, pool));

    match outcome {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_fixtures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FixtureParams>,
) -> impl IntoResponse {
    let outcome = state.service.fixtures(params.event).and_then(|matches| {
        let teams = state.service.teams()?;
        Ok(matches
            .into_iter()
            .map(|m| FixtureItem::new(m, &teams))
            .collect::<Vec<_>>())
    });

    match outcome {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(e),
    }
}
