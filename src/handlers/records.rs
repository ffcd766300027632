// src/handlers/records.rs

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::{LimitQuery, RecordFilterQuery, TenantPeriodQuery},
    },
    config::AppState,
    handlers::json_body,
    middleware::i18n::Locale,
    models::billing::{BillingRecord, RecentRecord, RecordRow, SaveReadingPayload, SavedReading},
    services::{billing_service::clamp_recent_limit, document_service::csv_filename},
};

// GET /api/records
#[utoipa::path(
    get,
    path = "/api/records",
    tag = "Records",
    params(
        ("tenantId" = Option<i64>, Query, description = "Filtra por inquilino"),
        ("year" = Option<i32>, Query, description = "Filtra por ano"),
        ("month" = Option<i32>, Query, description = "Filtra por mês")
    ),
    responses(
        (status = 200, description = "Histórico (ano e mês desc, depois quarto)", body = Vec<RecordRow>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<RecordFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let rows = app_state
        .billing_service
        .list_records(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(rows))
}

// GET /api/records/recent
#[utoipa::path(
    get,
    path = "/api/records/recent",
    tag = "Records",
    params(
        ("limit" = Option<i64>, Query, description = "Padrão 5, entre 1 e 50")
    ),
    responses(
        (status = 200, description = "Últimos registros gravados", body = Vec<RecentRecord>)
    )
)]
pub async fn recent_records(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = clamp_recent_limit(query.limit.as_deref());

    let rows = app_state
        .billing_service
        .recent_records(limit)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(rows))
}

// GET /api/records/previous
#[utoipa::path(
    get,
    path = "/api/records/previous",
    tag = "Records",
    params(
        ("tenantId" = i64, Query, description = "ID do inquilino"),
        ("year" = i32, Query, description = "Ano do período atual"),
        ("month" = i32, Query, description = "Mês do período atual")
    ),
    responses(
        (status = 200, description = "Registro do mês anterior, ou null", body = BillingRecord),
        (status = 400, description = "Parâmetro ausente ou inválido")
    )
)]
pub async fn previous_record(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TenantPeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (tenant_id, period) = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .billing_service
        .previous_record(tenant_id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(record))
}

// PUT /api/records
#[utoipa::path(
    put,
    path = "/api/records",
    tag = "Records",
    request_body = SaveReadingPayload,
    responses(
        (status = 200, description = "Registro gravado (criado ou sobrescrito)", body = SavedReading),
        (status = 400, description = "Payload inválido ou leitura menor que a do mês anterior"),
        (status = 404, description = "Inquilino não encontrado")
    )
)]
pub async fn save_record(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<SaveReadingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload, &locale)?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let saved = app_state
        .billing_service
        .save_reading(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(saved))
}

// GET /api/records/export.csv
#[utoipa::path(
    get,
    path = "/api/records/export.csv",
    tag = "Records",
    params(
        ("tenantId" = Option<i64>, Query, description = "Filtra por inquilino"),
        ("year" = Option<i32>, Query, description = "Filtra por ano"),
        ("month" = Option<i32>, Query, description = "Filtra por mês")
    ),
    responses(
        (status = 200, description = "Histórico em CSV", content_type = "text/csv", body = String)
    )
)]
pub async fn export_csv(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<RecordFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let rows = app_state
        .billing_service
        .list_records(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let csv = app_state.document_service.records_csv(&rows);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", csv_filename(&filter)),
        ),
    ];

    Ok((headers, csv))
}
