use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{
    GroupRankingRequest, RankedFinalRequest, ResultRequest, SquadRequest, SweepResponse,
};
use crate::domain::{EventId, MatchId, Pool, Side};
use crate::engine::SweepReport;

fn respond(result: anyhow::Result<SweepReport>) -> Response {
    match result {
        Ok(report) => Json(SweepResponse::from(report)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn post_result(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    Json(request): Json<ResultRequest>,
) -> impl IntoResponse {
    let outcome = (|| -> anyhow::Result<SweepReport> {
        let scores = request.scores()?;
        let side: Side = request.winner.parse()?;
        let changed_by = request
            .changed_by
            .as_deref()
            .unwrap_or(&state.config.server.default_recorder);
        state.service.record_result(match_id, scores, side, changed_by)
    })();
    respond(outcome)
}

pub async fn post_squad(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    Json(request): Json<SquadRequest>,
) -> impl IntoResponse {
    let outcome = (|| -> anyhow::Result<SweepReport> {
        let side: Side = request.side.parse()?;
        state.service.select_squad(match_id, side, &request.squad)
    })();
    respond(outcome)
}

pub async fn post_group_ranking(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    Json(request): Json<GroupRankingRequest>,
) -> impl IntoResponse {
    let outcome = (|| -> anyhow::Result<SweepReport> {
        let pool: Pool = request.pool.parse()?;
        let placings = request.top_three()?;
        state.service.submit_group_ranking(event_id, pool, placings)
    })();
    respond(outcome)
}

pub async fn post_ranked_final(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    Json(request): Json<RankedFinalRequest>,
) -> impl IntoResponse {
    respond(state.service.submit_ranked_final(event_id, request.placings))
}
