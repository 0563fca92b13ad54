//! Delivery history: GET /jobs?limit=N
//!
//! Lists the most recently scheduled jobs, sent ones included, newest first.

use axum::{
    extract::{Query, State},
    Json,
};
use courier_scheduler::ScheduledJob;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::IntakeError;
use crate::app::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Deserialize)]
pub struct JobsQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<ScheduledJob>,
}

/// GET /jobs
pub async fn jobs_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobsResponse>, IntakeError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let jobs = state.store.list_recent(limit)?;
    Ok(Json(JobsResponse { jobs }))
}
