// src/services/invoice_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::BillingStore,
    models::{
        billing::{InvoiceView, Usage},
        period::Period,
    },
    services::billing_calculator::usage_between,
};

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn BillingStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Visão de fatura (somente leitura, não grava nada).
    ///
    /// Sem registro no mês, devolve `record: None` e consumo zero.
    /// Sem registro no mês anterior, a base do consumo é zero.
    pub async fn invoice_view(&self, tenant_id: i64, period: Period) -> Result<InvoiceView, AppError> {
        let tenant = self
            .store
            .find_tenant(tenant_id)
            .await?
            .ok_or(AppError::TenantNotFound(tenant_id))?;

        let record = self.store.find_record(tenant_id, period).await?;
        let previous = self.store.find_record(tenant_id, period.previous()).await?;

        let usage = match &record {
            Some(current) => usage_between(
                current.readings(),
                previous.as_ref().map(|p| p.readings()).unwrap_or_default(),
            ),
            None => Usage::default(),
        };

        Ok(InvoiceView {
            tenant,
            record,
            previous,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryBillingStore,
        models::{billing::SaveReadingPayload, tenant::CreateTenantPayload},
        services::billing_service::BillingService,
    };
    use rust_decimal_macros::dec;

    async fn setup() -> (BillingService, InvoiceService, i64) {
        let store = Arc::new(MemoryBillingStore::new());
        let tenant = store
            .create_tenant(&CreateTenantPayload {
                room: "302".into(),
                name: "Chen".into(),
                electricity_rate: dec!(1),
                water_rate: dec!(4.5),
                rent: 520,
            })
            .await
            .unwrap();
        (BillingService::new(store.clone()), InvoiceService::new(store), tenant.id)
    }

    #[tokio::test]
    async fn missing_current_record_yields_empty_view() {
        let (_, invoices, id) = setup().await;

        let view = invoices.invoice_view(id, Period::new(2024, 6).unwrap()).await.unwrap();

        assert!(view.record.is_none());
        assert!(view.previous.is_none());
        assert_eq!(view.usage, Usage::default());
        assert_eq!(view.tenant.room, "302");
    }

    #[tokio::test]
    async fn view_carries_both_months_and_usage() {
        let (billing, invoices, id) = setup().await;
        for (month, e, w) in [(5, dec!(100), dec!(50)), (6, dec!(130), dec!(55))] {
            billing
                .save_reading(&SaveReadingPayload { tenant_id: id, year: 2024, month, electricity: e, water: w })
                .await
                .unwrap();
        }

        let view = invoices.invoice_view(id, Period::new(2024, 6).unwrap()).await.unwrap();

        assert_eq!(view.record.as_ref().map(|r| r.month), Some(6));
        assert_eq!(view.previous.as_ref().map(|r| r.month), Some(5));
        assert_eq!(view.usage, Usage { electricity: dec!(30), water: dec!(5) });
    }

    #[tokio::test]
    async fn without_previous_month_usage_counts_from_zero() {
        let (billing, invoices, id) = setup().await;
        billing
            .save_reading(&SaveReadingPayload { tenant_id: id, year: 2024, month: 1, electricity: dec!(12), water: dec!(3) })
            .await
            .unwrap();

        let view = invoices.invoice_view(id, Period::new(2024, 1).unwrap()).await.unwrap();
        assert!(view.previous.is_none());
        assert_eq!(view.usage, Usage { electricity: dec!(12), water: dec!(3) });
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let (_, invoices, _) = setup().await;
        let err = invoices.invoice_view(77, Period::new(2024, 1).unwrap()).await.unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound(77)));
    }
}
