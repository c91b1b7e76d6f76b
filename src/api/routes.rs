use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::{lock_event, unlock_event},
    scoring::{post_group_ranking, post_ranked_final, post_result, post_squad},
    standings::{get_championship, get_event_standings, get_fixtures},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/championship", get(get_championship))
        .route("/api/events/:id/standings/:pool", get(get_event_standings))
        .route("/api/fixtures", get(get_fixtures))
        .route("/api/matches/:id/result", post(post_result))
        .route("/api/matches/:id/squad", post(post_squad))
        .route("/api/events/:id/group-ranking", post(post_group_ranking))
        .route("/api/events/:id/ranked-final", post(post_ranked_final))
        .route("/api/admin/events/:id/lock", post(lock_event))
        .route("/api/admin/events/:id/unlock", post(unlock_event))
        .with_state(state)
}
