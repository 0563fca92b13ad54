//! Contact lookup: GET /contacts?name=<display name>
//!
//! Response: `{ "addresses": ["...", "..."] }`, possibly empty. Names are not
//! unique, so every match is returned.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::IntakeError;
use crate::app::AppState;

#[derive(Deserialize)]
pub struct ContactsQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub struct ContactsResponse {
    pub addresses: Vec<String>,
}

/// GET /contacts
pub async fn contacts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContactsQuery>,
) -> Result<Json<ContactsResponse>, IntakeError> {
    let addresses = state.resolver.resolve_by_name(&query.name).await?;
    Ok(Json(ContactsResponse { addresses }))
}
