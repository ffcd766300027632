// src/services/tenant_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::BillingStore,
    models::tenant::{CreateTenantPayload, Tenant, UpdateTenantPayload},
};

#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn BillingStore>,
}

impl TenantService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.store.list_tenants().await
    }

    pub async fn create_tenant(&self, input: &CreateTenantPayload) -> Result<Tenant, AppError> {
        let tenant = self.store.create_tenant(input).await?;
        tracing::info!(tenant_id = tenant.id, room = %tenant.room, "Inquilino criado");
        Ok(tenant)
    }

    /// Patch parcial. Só o Rate Card Store altera inquilinos.
    pub async fn update_tenant(&self, id: i64, patch: &UpdateTenantPayload) -> Result<Tenant, AppError> {
        let tenant = self
            .store
            .update_tenant(id, patch)
            .await?
            .ok_or(AppError::TenantNotFound(id))?;

        tracing::info!(tenant_id = id, "Inquilino atualizado");
        Ok(tenant)
    }

    /// Apaga o inquilino e, em cascata, todos os registros mensais dele.
    pub async fn delete_tenant(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete_tenant(id).await? {
            return Err(AppError::TenantNotFound(id));
        }

        tracing::info!(tenant_id = id, "Inquilino removido (registros em cascata)");
        Ok(())
    }
}
