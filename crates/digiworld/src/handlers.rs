//! HTTP handlers for the Digimon collection

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use store::{parse_id, Digimon, DigimonInput};
use tracing::{error, info};

use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::service::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Decode a request body into a candidate record
fn decode_body(body: &Bytes) -> ApiResult<DigimonInput> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    Ok(DigimonInput::from_json(&value))
}

fn path_id(raw: &str) -> ApiResult<i32> {
    parse_id(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// GET /digimons
pub async fn list_digimons(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Digimon>>>> {
    let digimons = state.store.list().await?;
    Ok(Json(ApiResponse::ok(digimons)))
}

/// POST /digimons
pub async fn create_digimon(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiResponse<Digimon>>)> {
    let input = decode_body(&body)?;
    let created = state.store.create(&input).await?;
    info!("Created digimon {} ({})", created.id, created.name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(created).with_message("Digimon created successfully")),
    ))
}

/// GET /digimons/{id}
pub async fn get_digimon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Digimon>>> {
    let id = path_id(&id)?;
    let digimon = state.store.get(id).await?;
    Ok(Json(ApiResponse::ok(digimon)))
}

/// PUT /digimons/{id}
pub async fn update_digimon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<Digimon>>> {
    let id = path_id(&id)?;
    let input = decode_body(&body)?;
    let updated = state.store.update(id, &input).await?;
    info!("Updated digimon {} ({})", updated.id, updated.name);

    Ok(Json(
        ApiResponse::ok(updated).with_message("Digimon updated successfully"),
    ))
}

/// DELETE /digimons/{id}
pub async fn delete_digimon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = path_id(&id)?;
    state.store.delete(id).await?;
    info!("Deleted digimon {}", id);

    Ok(Json(ApiResponse::message("Digimon deleted successfully")))
}

#[derive(Debug, Deserialize)]
pub struct ImageSearchParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResult {
    pub image_url: Option<String>,
}

/// GET /image-search?name=
pub async fn search_image(
    State(state): State<AppState>,
    Query(params): Query<ImageSearchParams>,
) -> Json<ApiResponse<ImageSearchResult>> {
    let image_url = match params.name.as_deref() {
        Some(name) => state.image_lookup.find_image(name).await,
        None => None,
    };
    Json(ApiResponse::ok(ImageSearchResult { image_url }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<()>>) {
    match state.store.database().health_check().await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::message("ok"))),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failure("Database unavailable")),
            )
        }
    }
}
