// src/db/store.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        billing::{BillingRecord, RecentRecord, RecordFilter, RecordRow, RecordUpsert},
        period::Period,
        tenant::{CreateTenantPayload, Tenant, UpdateTenantPayload},
    },
};

/// Contrato de persistência usado pelos serviços.
///
/// Regras que toda implementação precisa garantir:
/// - no máximo um registro por (tenant_id, year, month);
/// - `upsert_record` é atômico para essa chave: gravações concorrentes
///   nunca duplicam a linha, o último a escrever vence;
/// - `created_at` só é definido na primeira inserção;
/// - apagar um inquilino apaga todos os registros dele (cascata);
/// - uma mutação que retornou `Ok` já está durável no storage
///   (exceto onde a implementação documentar o contrário).
#[async_trait]
pub trait BillingStore: Send + Sync {
    // --- Inquilinos (tabela de tarifas) ---
    async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError>;
    async fn find_tenant(&self, id: i64) -> Result<Option<Tenant>, AppError>;
    async fn count_tenants(&self) -> Result<i64, AppError>;
    async fn create_tenant(&self, input: &CreateTenantPayload) -> Result<Tenant, AppError>;
    /// `None` quando o inquilino não existe.
    async fn update_tenant(&self, id: i64, patch: &UpdateTenantPayload) -> Result<Option<Tenant>, AppError>;
    /// `false` quando o inquilino não existe.
    async fn delete_tenant(&self, id: i64) -> Result<bool, AppError>;

    // --- Registros mensais ---
    async fn find_record(&self, tenant_id: i64, period: Period) -> Result<Option<BillingRecord>, AppError>;
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordRow>, AppError>;
    async fn recent_records(&self, limit: i64) -> Result<Vec<RecentRecord>, AppError>;
    async fn upsert_record(&self, input: &RecordUpsert) -> Result<BillingRecord, AppError>;
}
