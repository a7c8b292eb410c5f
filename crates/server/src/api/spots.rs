//! Catalog page handlers.
//!
//! Write endpoints follow the post/redirect/get pattern: every form post ends
//! with a redirect back to the listing. Recommend and delete are best effort,
//! so an unknown id still redirects; only update answers 404.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use spotlist_core::{SpotFields, SpotPatch, WriteOutcome};
use std::sync::Arc;
use tracing::{debug, info};

use super::error::ApiError;
use crate::metrics::record_operation;
use crate::state::AppState;
use crate::views::render_index;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for the search page
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in name or description
    pub q: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// 302 back to the listing.
fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// Ids arrive as raw path segments; anything non-numeric names no spot.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn record_outcome(operation: &str, result: &Result<WriteOutcome, ApiError>) {
    let outcome = match result {
        Ok(outcome) => outcome.as_str(),
        Err(_) => "error",
    };
    record_operation(operation, outcome);
}

// ============================================================================
// Handlers
// ============================================================================

/// List all spots
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let spots = state.catalog().list()?;
    Ok(Html(render_index(&spots, None)))
}

/// Search spots by name or description
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, ApiError> {
    let query = params.q.unwrap_or_default();
    let spots = state.catalog().search(&query)?;
    debug!(query = %query, results = spots.len(), "Spot search");

    Ok(Html(render_index(&spots, Some(&query))))
}

/// Create a spot from the add form
pub async fn add_spot(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<SpotFields>,
) -> Result<Response, ApiError> {
    let result = state.catalog().create(fields);
    record_operation("create", if result.is_ok() { "applied" } else { "error" });

    let spot = result?;
    info!(id = spot.id, name = %spot.name, "Spot created");

    Ok(redirect_home())
}

/// Recommend a spot (best effort)
pub async fn recommend_spot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let result = match parse_id(&id) {
        Some(id) => state.catalog().recommend(id).map_err(ApiError::from),
        None => Ok(WriteOutcome::Missing),
    };
    record_outcome("recommend", &result);

    if result? == WriteOutcome::Missing {
        debug!(id = %id, "Recommend for unknown spot ignored");
    }

    Ok(redirect_home())
}

/// Partially update a spot; empty form fields leave the stored value alone
pub async fn update_spot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(fields): Form<SpotFields>,
) -> Result<Response, ApiError> {
    let Some(spot_id) = parse_id(&id) else {
        record_operation("update", "missing");
        return Err(ApiError::SpotNotFound(id));
    };

    match state.catalog().update(spot_id, SpotPatch::from(fields)) {
        Ok(spot) => {
            record_operation("update", "applied");
            info!(id = spot.id, "Spot updated");
            Ok(redirect_home())
        }
        Err(e) => {
            let err = ApiError::from(e);
            let outcome = match err {
                ApiError::SpotNotFound(_) => "missing",
                ApiError::Storage(_) => "error",
            };
            record_operation("update", outcome);
            Err(err)
        }
    }
}

/// Delete a spot (best effort)
pub async fn delete_spot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let result = match parse_id(&id) {
        Some(id) => state.catalog().delete(id).map_err(ApiError::from),
        None => Ok(WriteOutcome::Missing),
    };
    record_outcome("delete", &result);

    if result? == WriteOutcome::Applied {
        info!(id = %id, "Spot deleted");
    }

    Ok(redirect_home())
}

/// Delete every checked spot
///
/// The form repeats the `ids` key once per checkbox, so the body is read as
/// raw pairs.
pub async fn batch_delete(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let ids: Vec<i64> = pairs
        .iter()
        .filter(|(key, _)| key == "ids")
        .filter_map(|(_, value)| parse_id(value))
        .collect();

    if ids.is_empty() {
        return Ok(redirect_home());
    }

    let result = state.catalog().batch_delete(&ids);
    record_operation("batch_delete", if result.is_ok() { "applied" } else { "error" });

    let removed = result?;
    info!(requested = ids.len(), removed, "Batch delete");

    Ok(redirect_home())
}
