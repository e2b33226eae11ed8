//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{CityEntry, ErrorResponse, EstimateRequest, PanelQuery};
use crate::sizing::{find_panel, recommend_panel};

fn error(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: message }))
}

/// Lists the configured cities with their profiles.
///
/// `GET /cities` → 200 + `Vec<CityEntry>` JSON (the `default` profile is omitted)
pub async fn get_cities(State(state): State<Arc<AppState>>) -> Json<Vec<CityEntry>> {
    let reference = state.estimator.reference();
    let cities = reference
        .city_names()
        .map(|name| CityEntry {
            name: name.to_string(),
            profile: reference.city_profile(name),
        })
        .collect();
    Json(cities)
}

/// Recommends a panel for a roof height.
///
/// `GET /panel?height_m=20` → 200 + `PanelRecommendation` JSON
/// `GET /panel?height_m=-1` → 400 + `ErrorResponse`
/// `GET /panel?height_m=200&strict=true` → 404 + `ErrorResponse`
pub async fn get_panel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let height = query.height_m;
    if !height.is_finite() || height < 0.0 {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`height_m` must be a finite value >= 0, got {height}"),
        ));
    }

    let bands = state.estimator.reference().panel_bands();
    if query.strict {
        find_panel(height, bands).map(Json).ok_or_else(|| {
            error(
                StatusCode::NOT_FOUND,
                format!("no panel band covers a height of {height} m"),
            )
        })
    } else {
        Ok(Json(recommend_panel(height, bands)))
    }
}

/// Runs a full estimate.
///
/// `POST /estimate` → 200 + `Estimate` JSON, or 400 + `ErrorResponse` when
/// an input is out of range
pub async fn post_estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> impl IntoResponse {
    let (load, site) = request.into_inputs();
    state.estimator.estimate(&load, &site).map(Json).map_err(|e| {
        warn!(error = %e, "rejected estimate request");
        error(StatusCode::BAD_REQUEST, e.to_string())
    })
}
