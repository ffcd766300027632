// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{store::BillingStore, RecordRepository, TenantRepository},
    models::{
        billing::{BillingRecord, RecentRecord, RecordFilter, RecordRow, RecordUpsert},
        period::Period,
        tenant::{CreateTenantPayload, Tenant, UpdateTenantPayload},
    },
};

/// Storage em Postgres. Cada chamada é uma única instrução autocommit,
/// então o que retornou `Ok` já está gravado.
#[derive(Clone)]
pub struct PgBillingStore {
    tenants: TenantRepository,
    records: RecordRepository,
}

impl PgBillingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tenants: TenantRepository::new(pool.clone()),
            records: RecordRepository::new(pool),
        }
    }
}

#[async_trait]
impl BillingStore for PgBillingStore {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenants.list().await
    }

    async fn find_tenant(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        self.tenants.find_by_id(id).await
    }

    async fn count_tenants(&self) -> Result<i64, AppError> {
        self.tenants.count().await
    }

    async fn create_tenant(&self, input: &CreateTenantPayload) -> Result<Tenant, AppError> {
        self.tenants.create(input).await
    }

    async fn update_tenant(&self, id: i64, patch: &UpdateTenantPayload) -> Result<Option<Tenant>, AppError> {
        self.tenants.update(id, patch).await
    }

    async fn delete_tenant(&self, id: i64) -> Result<bool, AppError> {
        self.tenants.delete(id).await
    }

    async fn find_record(&self, tenant_id: i64, period: Period) -> Result<Option<BillingRecord>, AppError> {
        self.records.find(tenant_id, period).await
    }

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordRow>, AppError> {
        self.records.list(filter).await
    }

    async fn recent_records(&self, limit: i64) -> Result<Vec<RecentRecord>, AppError> {
        self.records.recent(limit).await
    }

    async fn upsert_record(&self, input: &RecordUpsert) -> Result<BillingRecord, AppError> {
        self.records.upsert(input).await
    }
}
