//! HTTP routes of the responder API

use std::time::Duration;

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::{State, rejection::JsonRejection},
    routing::{get, post, put},
};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use responder_core::{
    Coordinate, Error, NearestService, RouteResult, Seconds, ServiceCategory,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::{
    BoxError, ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::error::Elapsed,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    pub origin: Coordinate,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct NearestEntry {
    #[serde(flatten)]
    pub nearest: NearestService,
    pub eta: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    /// Service id
    pub destination: String,
    #[serde(default = "default_alternatives")]
    pub alternatives: usize,
    /// Defaults to the time the request is received
    #[serde(default)]
    pub departure: Option<DateTime<FixedOffset>>,
}

fn default_alternatives() -> usize {
    2
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeUpdate {
    pub edge_id: String,
    pub multiplier: f64,
}

#[derive(Debug, Deserialize)]
pub struct TrafficRequest {
    pub updates: Vec<EdgeUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedUpdate {
    pub edge_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct TrafficResponse {
    pub applied: usize,
    pub rejected: Vec<RejectedUpdate>,
}

pub fn router(state: AppState, request_timeout: Duration, concurrency_limit: usize) -> Router {
    let limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(request_timeout)
        .layer(shared_concurrency_limit(concurrency_limit));

    Router::new()
        .route("/health", get(health))
        .route("/v1/nearest", post(nearest))
        .route("/v1/route", post(route))
        .route("/v1/traffic", put(traffic))
        .layer(limits)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// One semaphore for every route the layer is applied to
fn shared_concurrency_limit(limit: usize) -> GlobalConcurrencyLimitLayer {
    GlobalConcurrencyLimitLayer::new(limit)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::RequestTimeout
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {err}"))
    }
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Engine(Error::InvalidArgument(rejection.body_text())))
}

fn eta_after(
    start: DateTime<FixedOffset>,
    duration: Seconds,
) -> Result<DateTime<FixedOffset>, ApiError> {
    #[allow(clippy::cast_possible_truncation)]
    let millis = (duration * 1000.0).round() as i64;
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| ApiError::Internal(format!("ETA out of range for {duration}s")))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "nodes": state.engine.graph().node_count(),
        "edges": state.engine.graph().edge_count(),
        "services": state.registry.len(),
    }))
}

async fn nearest(
    State(state): State<AppState>,
    body: Result<Json<NearestRequest>, JsonRejection>,
) -> Result<Json<Vec<NearestEntry>>, ApiError> {
    let request = parse_body(body)?;
    let now = Utc::now().fixed_offset();

    let ranked = state
        .run_query(move |engine, registry, cancel| {
            engine.find_nearest_services(
                request.origin,
                registry.as_slice(),
                request.category,
                request.limit,
                cancel,
            )
        })
        .await?;

    let entries = ranked
        .into_iter()
        .map(|nearest| {
            let eta = eta_after(now, nearest.duration)?;
            Ok(NearestEntry { nearest, eta })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(Json(entries))
}

async fn route(
    State(state): State<AppState>,
    body: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteResult>, ApiError> {
    let request = parse_body(body)?;
    let destination = state
        .registry
        .get(&request.destination)
        .cloned()
        .ok_or_else(|| ApiError::UnknownService(request.destination.clone()))?;
    let departure = request
        .departure
        .unwrap_or_else(|| Utc::now().fixed_offset());

    let result = state
        .run_query(move |engine, _, cancel| {
            engine.compute_route(
                request.origin,
                &destination,
                request.alternatives,
                departure,
                cancel,
            )
        })
        .await?;
    Ok(Json(result))
}

async fn traffic(
    State(state): State<AppState>,
    body: Result<Json<TrafficRequest>, JsonRejection>,
) -> Result<Json<TrafficResponse>, ApiError> {
    let request = parse_body(body)?;
    let report = state.engine.update_edges(
        request
            .updates
            .into_iter()
            .map(|update| (update.edge_id, update.multiplier)),
    );

    let rejected = report
        .rejected
        .into_iter()
        .map(|(edge_id, err)| RejectedUpdate {
            edge_id,
            reason: err.to_string(),
        })
        .collect();
    Ok(Json(TrafficResponse {
        applied: report.applied,
        rejected,
    }))
}
