use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::errors::EngineError;
use crate::services::scoring::ScoringService;

pub mod admin;
pub mod scoring;
pub mod standings;

pub struct AppState {
    pub service: ScoringService,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            service: ScoringService::new(pool, config.points.points_scale()),
            config,
        }
    }
}

/// Maps a failed operation onto an HTTP status
pub fn error_response(err: anyhow::Error) -> Response {
    let status = match err.downcast_ref::<EngineError>() {
        Some(EngineError::EventLocked(_)) => StatusCode::FORBIDDEN,
        Some(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        Some(e) if e.is_integrity_fault() => StatusCode::INTERNAL_SERVER_ERROR,
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {:?}", err);
    }
    (status, err.to_string()).into_response()
}
