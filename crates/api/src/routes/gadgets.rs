//! Gadget endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_gadget_created, record_gadget_decommissioned, record_gadget_destroyed,
};
use domain::models::gadget::{
    CreateGadgetResponse, DecommissionGadgetRequest, DecommissionGadgetResponse,
    ListGadgetsQuery, ListGadgetsResponse, SelfDestructResponse, UpdateGadgetRequest,
    UpdateGadgetResponse,
};

/// List gadgets with a freshly rolled success probability each.
///
/// GET /api/v1/gadgets?status=<status>
pub async fn list_gadgets(
    State(state): State<AppState>,
    Query(query): Query<ListGadgetsQuery>,
) -> Result<Json<ListGadgetsResponse>, ApiError> {
    let names_with_chances = state
        .gadgets
        .list_with_chances(&query)
        .await
        .map_err(|e| ApiError::from_gadget(e, "Failed to fetch gadgets"))?;

    Ok(Json(ListGadgetsResponse { names_with_chances }))
}

/// Create a gadget with a generated name.
///
/// POST /api/v1/gadgets
pub async fn create_gadget(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateGadgetResponse>), ApiError> {
    let gadget = state
        .gadgets
        .create()
        .await
        .map_err(|e| ApiError::from_gadget(e, "Failed to create gadget"))?;

    record_gadget_created();

    Ok((StatusCode::CREATED, Json(gadget.into())))
}

/// Update a gadget's name and/or status.
///
/// PATCH /api/v1/gadgets
pub async fn update_gadget(
    State(state): State<AppState>,
    Json(request): Json<UpdateGadgetRequest>,
) -> Result<Json<UpdateGadgetResponse>, ApiError> {
    let gadget = state
        .gadgets
        .update(request)
        .await
        .map_err(|e| ApiError::from_gadget(e, "Failed to update gadget"))?;

    Ok(Json(gadget.into()))
}

/// Decommission a gadget. The record is kept.
///
/// DELETE /api/v1/gadgets
pub async fn decommission_gadget(
    State(state): State<AppState>,
    Json(request): Json<DecommissionGadgetRequest>,
) -> Result<Json<DecommissionGadgetResponse>, ApiError> {
    let gadget = state
        .gadgets
        .decommission(&request.id)
        .await
        .map_err(|e| ApiError::from_gadget(e, "Failed to decommission gadget"))?;

    record_gadget_decommissioned();

    Ok(Json(gadget.into()))
}

/// Trigger the self-destruct sequence for a gadget.
///
/// POST /api/v1/gadgets/:id/self-destruct
pub async fn self_destruct_gadget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SelfDestructResponse>, ApiError> {
    let outcome = state
        .gadgets
        .self_destruct(&id)
        .await
        .map_err(|e| ApiError::from_gadget(e, "Failed to self-destruct gadget"))?;

    record_gadget_destroyed();

    Ok(Json(SelfDestructResponse {
        message: "Gadget self-destructed".to_string(),
        id: outcome.gadget.id,
        name: outcome.gadget.name,
        status: outcome.gadget.status,
        confirmation_code: outcome.confirmation_code,
    }))
}
