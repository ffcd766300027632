// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rent Ledger API",
        description = "Aluguel, luz e água por quarto, mês a mês"
    ),
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Tenants ---
        handlers::tenants::list_tenants,
        handlers::tenants::create_tenant,
        handlers::tenants::update_tenant,
        handlers::tenants::delete_tenant,

        // --- Records ---
        handlers::records::list_records,
        handlers::records::recent_records,
        handlers::records::previous_record,
        handlers::records::save_record,
        handlers::records::export_csv,

        // --- Invoice ---
        handlers::invoice::get_invoice,
        handlers::invoice::get_invoice_pdf,
    ),
    components(
        schemas(
            // --- Tenants ---
            models::tenant::Tenant,
            models::tenant::CreateTenantPayload,
            models::tenant::UpdateTenantPayload,
            handlers::tenants::CreatedId,

            // --- Records ---
            models::period::Period,
            models::billing::BillingRecord,
            models::billing::MeterReadings,
            models::billing::Usage,
            models::billing::RecordRow,
            models::billing::RecentRecord,
            models::billing::SaveReadingPayload,
            models::billing::SavedReading,

            // --- Invoice ---
            models::billing::InvoiceView,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Tenants", description = "Quartos, inquilinos e tarifas"),
        (name = "Records", description = "Leituras mensais, histórico e exportação CSV"),
        (name = "Invoice", description = "Fatura mensal (JSON e PDF)")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/tenants",
            "/api/tenants/{id}",
            "/api/records",
            "/api/records/recent",
            "/api/records/previous",
            "/api/records/export.csv",
            "/api/invoice",
            "/api/invoice/pdf",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing from OpenAPI");
        }
    }
}
