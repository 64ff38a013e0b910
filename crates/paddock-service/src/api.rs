//! HTTP routes over the aggregator
//!
//! Every route is a `GET` returning JSON. Errors map to a status code from
//! [`PaddockError::status_code`] and a body of `{"error": message}`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use paddock_aggregate::{Aggregator, ChampionshipTree, ParentWithChildren};
use paddock_errors::{PaddockError, ValidationError};
use paddock_records::{EntityKind, Record};
use paddock_store::KeyValueStore;
use serde_json::json;
use tracing::{debug, error, warn};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
}

/// An aggregation error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PaddockError);

impl From<PaddockError> for ApiError {
    fn from(err: PaddockError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(PaddockError::InvalidInput(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_transient() {
            error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Build the router.
pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/championships", listing(EntityKind::Championship))
        .route("/championships/{id}", get(championship))
        .route("/championships/{id}/tree", get(championship_tree))
        .route("/seasons", listing(EntityKind::Season))
        .route("/seasons/{id}", get(season))
        .route("/seasons/{id}/{relation}", get(season_relation))
        .route("/categories", listing(EntityKind::Category))
        .route("/categories/{id}", single(EntityKind::Category))
        .route("/stages", listing(EntityKind::Stage))
        .route("/stages/{id}", single(EntityKind::Stage))
        .route("/regulations", listing(EntityKind::Regulation))
        .route("/regulations/{id}", single(EntityKind::Regulation))
        .route("/race-tracks", listing(EntityKind::RaceTrack))
        .route("/race-tracks/{id}", single(EntityKind::RaceTrack))
        .route("/users", listing(EntityKind::User))
        .route("/users/{id}", single(EntityKind::User))
        .route("/clubs", listing(EntityKind::Club))
        .route("/clubs/{id}", single(EntityKind::Club))
        .with_state(AppState { aggregator })
}

async fn health(State(state): State<AppState>) -> Response {
    match state.aggregator.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

fn listing(kind: EntityKind) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        let records: ApiResult<Vec<Record>> = Ok(Json(state.aggregator.list(kind).await?));
        records
    })
}

fn single(kind: EntityKind) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>, Path(id): Path<String>| async move {
            let record: ApiResult<Record> = Ok(Json(state.aggregator.fetch_one(kind, &id).await?));
            record
        },
    )
}

async fn championship(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ParentWithChildren> {
    let shape = state
        .aggregator
        .parent_with_children(EntityKind::Championship, &id, EntityKind::Season)
        .await?;
    Ok(Json(shape))
}

async fn championship_tree(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ChampionshipTree> {
    Ok(Json(state.aggregator.championship_tree(&id).await?))
}

async fn season(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ParentWithChildren> {
    let shape = state
        .aggregator
        .parent_with_child_types(EntityKind::Season, &id, EntityKind::Season.children())
        .await?;
    Ok(Json(shape))
}

async fn season_relation(
    State(state): State<AppState>,
    Path((id, relation)): Path<(String, String)>,
) -> ApiResult<ParentWithChildren> {
    let child = EntityKind::from_relation(&relation).ok_or_else(|| {
        ValidationError::invalid_enum("relation", relation.as_str(), "categories, stages, regulations")
    })?;
    let shape = state
        .aggregator
        .parent_with_children(EntityKind::Season, &id, child)
        .await?;
    Ok(Json(shape))
}
