// src/handlers/invoice.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        query::TenantPeriodQuery,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::billing::InvoiceView,
    services::document_service::invoice_filename,
};

// GET /api/invoice
#[utoipa::path(
    get,
    path = "/api/invoice",
    tag = "Invoice",
    params(
        ("tenantId" = i64, Query, description = "ID do inquilino"),
        ("year" = i32, Query, description = "Ano"),
        ("month" = i32, Query, description = "Mês")
    ),
    responses(
        (status = 200, description = "Fatura do mês (record null se não houver registro)", body = InvoiceView),
        (status = 400, description = "Parâmetro ausente ou inválido"),
        (status = 404, description = "Inquilino não encontrado")
    )
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TenantPeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (tenant_id, period) = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .invoice_service
        .invoice_view(tenant_id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(view))
}

// GET /api/invoice/pdf
#[utoipa::path(
    get,
    path = "/api/invoice/pdf",
    tag = "Invoice",
    params(
        ("tenantId" = i64, Query, description = "ID do inquilino"),
        ("year" = i32, Query, description = "Ano"),
        ("month" = i32, Query, description = "Mês")
    ),
    responses(
        (status = 200, description = "Fatura em PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Inquilino não encontrado")
    )
)]
pub async fn get_invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TenantPeriodQuery>,
) -> Result<Response, ApiError> {
    let (tenant_id, period) = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let view = app_state
        .invoice_service
        .invoice_view(tenant_id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // O genpdf é síncrono e pesado: fora do runtime async
    let documents = app_state.document_service.clone();
    let lang = locale.0;
    let render_view = view.clone();
    let pdf_bytes = tokio::task::spawn_blocking(move || documents.invoice_pdf(&render_view, period, lang))
        .await
        .map_err(|e| AppError::InternalServerError(e.into()).to_api_error(&locale))?
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", invoice_filename(&view.tenant.room, period)),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
