//! HTTP route handlers.

use std::collections::BTreeSet;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::catalog::CatalogStats;
use crate::domain::{Coordinate, Station, StationId};
use crate::error::EngineError;

use super::dto::*;
use super::state::AppState;

/// Route count used when a request does not ask for a specific number.
const DEFAULT_ALTERNATIVES: usize = 3;

/// Upper bound on alternative routes per request.
const MAX_ALTERNATIVES: usize = 10;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations/stats", get(station_stats))
        .route("/stations/nearest", get(nearest_station))
        .route("/stations/rank", post(rank_stations))
        .route("/stations/:id", get(get_station))
        .route("/trips/plan", post(plan_trip))
        .route("/routes/alternatives", post(route_alternatives))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Summary figures for the loaded catalog.
async fn station_stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog.statistics())
}

/// Look up a single station.
async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Station>, AppError> {
    state
        .catalog
        .get(&StationId::new(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown station: {id}"),
        })
}

/// Rank filtered candidates around an origin.
async fn rank_stations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RankResponse>, AppError> {
    let req: RankRequest = parse_body(&body)?;
    let origin = req.origin.coordinate()?;

    let top_k = match req.top_k {
        None => state.config().top_k,
        Some(k) if k > 0 => usize::try_from(k).unwrap_or(usize::MAX),
        Some(k) => return Err(EngineError::InvalidTopK { top_k: k }.into()),
    };
    let weights = req.weights.unwrap_or_default();
    let speed = req.speed_kmh.unwrap_or(state.config().assumed_speed_kmh);

    let candidates = state.catalog.candidates(&req.filter, origin);
    let ranked = state
        .coordinator
        .find_best_stations(origin, &candidates, &weights, top_k, speed)?;

    Ok(Json(RankResponse {
        results: ranked.iter().map(RankedStationResult::from_ranked).collect(),
        candidates: ranked.candidates,
    }))
}

/// The closest station to a point.
async fn nearest_station(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<RankedStationResult>, AppError> {
    let origin = Coordinate::new(query.lat, query.lon).map_err(EngineError::from)?;
    let speed = query
        .speed_kmh
        .unwrap_or(state.config().assumed_speed_kmh);

    let nearest = state
        .coordinator
        .nearest_station(origin, state.catalog.stations(), speed)?;
    Ok(Json(RankedStationResult::from_ranked(&nearest)))
}

/// Plan a trip through stations in the given order.
async fn plan_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    let req: TripRequest = parse_body(&body)?;
    let origin = req.origin.coordinate()?;
    let speed = req.speed_kmh.unwrap_or(state.config().assumed_speed_kmh);

    let plan = state
        .coordinator
        .plan_trip(origin, state.catalog.stations(), &req.stops, speed)?;
    Ok(Json(TripResponse::from_plan(&plan)))
}

/// Alternative routes from an origin to one station.
async fn route_alternatives(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AlternativesResponse>, AppError> {
    let req: AlternativesRequest = parse_body(&body)?;
    let origin = req.origin.coordinate()?;
    let speed = req.speed_kmh.unwrap_or(state.config().assumed_speed_kmh);
    let k = req.k.unwrap_or(DEFAULT_ALTERNATIVES).min(MAX_ALTERNATIVES);

    let options = match &req.via {
        None => state.coordinator.route_alternatives(
            origin,
            state.catalog.stations(),
            &req.station_id,
            k,
            speed,
        )?,
        Some(via) => {
            let ids: BTreeSet<&StationId> =
                std::iter::once(&req.station_id).chain(via.iter()).collect();
            let members = ids
                .into_iter()
                .map(|id| {
                    state
                        .catalog
                        .get(id)
                        .ok_or_else(|| EngineError::UnknownStation { id: id.clone() })
                })
                .collect::<Result<Vec<_>, _>>()?;
            state
                .coordinator
                .route_alternatives(origin, &members, &req.station_id, k, speed)?
        }
    };

    Ok(Json(AlternativesResponse {
        routes: options.iter().map(RouteResult::from_option).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UnknownStation { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            e if e.is_caller_error() => AppError::BadRequest {
                message: e.to_string(),
            },
            e => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
