//! Type definition route handlers.

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::{
    FieldDefinitionFormValues, ResourceTypeId, TypeDefinition, TypeFormValues, TypeUpdateAction,
};
use crate::services::UpdateOutcome;
use crate::storage::FieldDefinitionsByName;
use crate::storage::error::check_version;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTypeRequest {
    pub values: TypeFormValues,
    #[serde(default)]
    pub resource_type_ids: Vec<ResourceTypeId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTypeRequest {
    pub version: i64,
    pub values: TypeFormValues,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFieldDefinitionRequest {
    pub version: i64,
    pub field_definition: FieldDefinitionFormValues,
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: i64,
}

#[derive(Debug, Deserialize)]
pub struct FieldDefinitionsQuery {
    /// Comma separated field names
    #[serde(default)]
    pub include: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeUpdateResponse {
    pub status: &'static str,
    pub actions: Vec<TypeUpdateAction>,
    pub type_definition: TypeDefinition,
}

/// Create the types router
pub fn types_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_type))
        .route(
            "/{type_id}",
            get(get_type).put(update_type).delete(delete_type),
        )
        .route(
            "/{type_id}/field-definitions",
            get(get_field_definitions).post(add_field_definition),
        )
        .route(
            "/{type_id}/field-definitions/{field_name}",
            delete(remove_field_definition),
        )
}

/// GET /types/{type_id}
async fn get_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
) -> Result<Json<TypeDefinition>, ApiError> {
    Ok(Json(state.types.fetch(&type_id).await?))
}

/// GET /types/{type_id}/field-definitions?include=a,b
async fn get_field_definitions(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    Query(query): Query<FieldDefinitionsQuery>,
) -> Result<Json<FieldDefinitionsByName>, ApiError> {
    let include: Vec<String> = query
        .include
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Json(
        state
            .types
            .fetch_field_definitions(&type_id, &include)
            .await?,
    ))
}

/// POST /types
async fn create_type(
    State(state): State<AppState>,
    Json(request): Json<CreateTypeRequest>,
) -> Result<(StatusCode, Json<TypeDefinition>), ApiError> {
    let created = state
        .types
        .create(&request.values, request.resource_type_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /types/{type_id}
///
/// Diffs the submitted form against the stored definition at `version`.
async fn update_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    Json(request): Json<UpdateTypeRequest>,
) -> Result<Json<TypeUpdateResponse>, ApiError> {
    info!("[Types] Update request for type_id: {}", type_id);
    let original = state.types.fetch(&type_id).await?;
    check_version("type-definition", &type_id, request.version, original.version)?;

    let response = match state.types.update(&original, &request.values).await? {
        UpdateOutcome::Unchanged => TypeUpdateResponse {
            status: "unchanged",
            actions: Vec::new(),
            type_definition: original,
        },
        UpdateOutcome::Updated { entity, actions } => TypeUpdateResponse {
            status: "updated",
            actions,
            type_definition: entity,
        },
    };
    Ok(Json(response))
}

/// POST /types/{type_id}/field-definitions
async fn add_field_definition(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    Json(request): Json<AddFieldDefinitionRequest>,
) -> Result<Json<TypeDefinition>, ApiError> {
    let updated = state
        .types
        .add_field_definition(&type_id, request.version, &request.field_definition)
        .await?;
    Ok(Json(updated))
}

/// DELETE /types/{type_id}/field-definitions/{field_name}?version=
async fn remove_field_definition(
    State(state): State<AppState>,
    Path((type_id, field_name)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<TypeDefinition>, ApiError> {
    let updated = state
        .types
        .remove_field_definition(&type_id, query.version, &field_name)
        .await?;
    Ok(Json(updated))
}

/// DELETE /types/{type_id}?version=
async fn delete_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<TypeDefinition>, ApiError> {
    Ok(Json(state.types.delete(&type_id, query.version).await?))
}
