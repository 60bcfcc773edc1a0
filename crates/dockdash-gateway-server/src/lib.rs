use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dockdash_common::{
    ContainerRecord, DeleteIdsRequest, DeleteNamesRequest, DeleteResponse, DeleteResult,
    ImageRecord, NetworkRecord, ResourceKind, UsageSummary, VolumeDeleteResult, VolumeRecord,
};
use dockdash_engine::{remove_all, Engine};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

pub mod config;
mod error;

pub use config::GatewayConfig;
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn Engine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/containers", get(list_containers_handler).delete(delete_containers_handler))
        .route("/api/images", get(list_images_handler).delete(delete_images_handler))
        .route("/api/volumes", get(list_volumes_handler).delete(delete_volumes_handler))
        .route("/api/networks", get(list_networks_handler).delete(delete_networks_handler))
        .route("/api/system", get(system_handler))
        // Health check with engine status
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[instrument(skip(state))]
async fn list_containers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContainerRecord>>, ApiError> {
    let containers = state
        .engine
        .list_containers()
        .await
        .map_err(ApiError::engine("list containers"))?;
    Ok(Json(containers))
}

#[instrument(skip(state))]
async fn list_images_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let images = state
        .engine
        .list_images()
        .await
        .map_err(ApiError::engine("list images"))?;
    Ok(Json(images))
}

#[instrument(skip(state))]
async fn list_volumes_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<VolumeRecord>>, ApiError> {
    let volumes = state
        .engine
        .list_volumes()
        .await
        .map_err(ApiError::engine("list volumes"))?;
    Ok(Json(volumes))
}

#[instrument(skip(state))]
async fn list_networks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<NetworkRecord>>, ApiError> {
    let networks = state
        .engine
        .list_networks()
        .await
        .map_err(ApiError::engine("list networks"))?;
    Ok(Json(networks))
}

#[instrument(skip(state))]
async fn system_handler(State(state): State<AppState>) -> Result<Json<UsageSummary>, ApiError> {
    let usage = state
        .engine
        .usage()
        .await
        .map_err(ApiError::engine("get system usage"))?;
    Ok(Json(usage))
}

async fn delete_by_id(
    state: &AppState,
    kind: ResourceKind,
    ids: Vec<String>,
) -> Json<DeleteResponse<DeleteResult>> {
    info!(%kind, count = ids.len(), "Delete requested");
    let outcomes = remove_all(state.engine.as_ref(), kind, ids).await;
    Json(DeleteResponse {
        results: outcomes.into_iter().map(DeleteResult::from).collect(),
    })
}

#[instrument(skip(state, req))]
async fn delete_containers_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteIdsRequest>,
) -> Json<DeleteResponse<DeleteResult>> {
    delete_by_id(&state, ResourceKind::Containers, req.ids).await
}

#[instrument(skip(state, req))]
async fn delete_images_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteIdsRequest>,
) -> Json<DeleteResponse<DeleteResult>> {
    delete_by_id(&state, ResourceKind::Images, req.ids).await
}

#[instrument(skip(state, req))]
async fn delete_networks_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteIdsRequest>,
) -> Json<DeleteResponse<DeleteResult>> {
    delete_by_id(&state, ResourceKind::Networks, req.ids).await
}

#[instrument(skip(state, req))]
async fn delete_volumes_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteNamesRequest>,
) -> Json<DeleteResponse<VolumeDeleteResult>> {
    info!(count = req.names.len(), "Volume delete requested");
    let outcomes = remove_all(state.engine.as_ref(), ResourceKind::Volumes, req.names).await;
    Json(DeleteResponse {
        results: outcomes.into_iter().map(VolumeDeleteResult::from).collect(),
    })
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, engine) = match state.engine.ping().await {
        Ok(version) => ("healthy", serde_json::json!({ "status": "reachable", "version": version })),
        Err(e) => {
            warn!(error = %e, "Engine ping failed");
            ("unhealthy", serde_json::json!({ "status": "unreachable" }))
        }
    };

    Json(serde_json::json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "engine": engine,
    }))
}

#[cfg(test)]
mod tests;
