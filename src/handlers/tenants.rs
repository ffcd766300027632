// src/handlers/tenants.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::{json_body, path_id},
    middleware::i18n::Locale,
    models::tenant::{CreateTenantPayload, Tenant, UpdateTenantPayload},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedId {
    #[schema(example = 12)]
    pub id: i64,
}

// GET /api/tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    responses(
        (status = 200, description = "Inquilinos em ordem de quarto", body = Vec<Tenant>)
    )
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tenants = app_state
        .tenant_service
        .list_tenants()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tenants))
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, description = "Inquilino criado", body = CreatedId),
        (status = 400, description = "Payload inválido")
    )
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreateTenantPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload, &locale)?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let tenant = app_state
        .tenant_service
        .create_tenant(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(CreatedId { id: tenant.id })))
}

// PATCH /api/tenants/{id}
#[utoipa::path(
    patch,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    request_body = UpdateTenantPayload,
    params(
        ("id" = i64, Path, description = "ID do inquilino")
    ),
    responses(
        (status = 200, description = "Inquilino atualizado", body = Tenant),
        (status = 404, description = "Inquilino não encontrado")
    )
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTenantPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&id, &locale)?;
    let payload = json_body(payload, &locale)?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let tenant = app_state
        .tenant_service
        .update_tenant(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tenant))
}

// DELETE /api/tenants/{id}
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(
        ("id" = i64, Path, description = "ID do inquilino")
    ),
    responses(
        (status = 200, description = "Inquilino e registros removidos", example = json!({ "ok": true })),
        (status = 404, description = "Inquilino não encontrado")
    )
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&id, &locale)?;

    app_state
        .tenant_service
        .delete_tenant(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(json!({ "ok": true })))
}
