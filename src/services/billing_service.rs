// src/services/billing_service.rs

use std::sync::Arc;

use crate::{
    common::error::{AppError, Meter},
    db::BillingStore,
    models::{
        billing::{
            BillingRecord, MeterReadings, RecentRecord, RecordFilter, RecordRow, RecordUpsert,
            SaveReadingPayload, SavedReading, Usage,
        },
        period::Period,
    },
    services::billing_calculator::compute_bill,
};

pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 50;

/// Limite do GET /records/recent: padrão 5, sempre entre 1 e 50.
/// Valores não numéricos (ou zero) caem no padrão.
pub fn clamp_recent_limit(raw: Option<&str>) -> i64 {
    let parsed = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v != 0.0)
        .map(|v| v.trunc() as i64)
        .unwrap_or(DEFAULT_RECENT_LIMIT);

    parsed.clamp(1, MAX_RECENT_LIMIT)
}

// ---
// Serviço de conciliação dos registros mensais
// ---
#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn BillingStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Registro do mês anterior ao período informado (se houver).
    pub async fn previous_record(
        &self,
        tenant_id: i64,
        period: Period,
    ) -> Result<Option<BillingRecord>, AppError> {
        self.store.find_record(tenant_id, period.previous()).await
    }

    /// LÓGICA DE NEGÓCIO: grava as leituras de um mês, recalculando tarifas e total.
    ///
    /// Leituras cumulativas não podem voltar para trás em relação ao mês anterior.
    /// Sem registro no mês anterior, a base é zero.
    pub async fn save_reading(&self, input: &SaveReadingPayload) -> Result<SavedReading, AppError> {
        let period = Period::new(input.year, input.month)?;
        let current = MeterReadings {
            electricity: input.electricity,
            water: input.water,
        };

        // 1. Tarifas do inquilino
        let tenant = self
            .store
            .find_tenant(input.tenant_id)
            .await?
            .ok_or(AppError::TenantNotFound(input.tenant_id))?;

        // 2 e 3. Leitura do mês anterior (ou zero)
        let previous = self
            .previous_record(tenant.id, period)
            .await?
            .map(|r| r.readings())
            .unwrap_or_default();

        // 4. Leitura não pode regredir
        if current.electricity < previous.electricity {
            tracing::warn!(tenant_id = tenant.id, %period, "Leitura de luz menor que a do mês anterior");
            return Err(AppError::ReadingRegression {
                meter: Meter::Electricity,
                previous: previous.electricity,
                current: current.electricity,
            });
        }
        if current.water < previous.water {
            tracing::warn!(tenant_id = tenant.id, %period, "Leitura de água menor que a do mês anterior");
            return Err(AppError::ReadingRegression {
                meter: Meter::Water,
                previous: previous.water,
                current: current.water,
            });
        }

        // 5. Cálculo (nada é gravado se o valor não couber)
        let bill = compute_bill(current, previous, &tenant.rate_card()).ok_or_else(|| {
            tracing::warn!(tenant_id = tenant.id, %period, "Valor da conta fora da faixa do Decimal");
            AppError::AmountOutOfRange { tenant_id: tenant.id }
        })?;

        // 6. Upsert atômico na chave (tenant, ano, mês)
        let record = self
            .store
            .upsert_record(&RecordUpsert {
                tenant_id: tenant.id,
                period,
                readings: current,
                bill,
            })
            .await?;

        tracing::info!(
            tenant_id = tenant.id,
            %period,
            total = %record.total,
            "Registro mensal gravado"
        );

        Ok(SavedReading {
            record,
            previous,
            usage: Usage {
                electricity: bill.electricity_usage,
                water: bill.water_usage,
            },
        })
    }

    pub async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordRow>, AppError> {
        self.store.list_records(filter).await
    }

    pub async fn recent_records(&self, limit: i64) -> Result<Vec<RecentRecord>, AppError> {
        self.store
            .recent_records(limit.clamp(1, MAX_RECENT_LIMIT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBillingStore;
    use crate::models::tenant::CreateTenantPayload;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn setup() -> (Arc<MemoryBillingStore>, BillingService, i64) {
        let store = Arc::new(MemoryBillingStore::new());
        let tenant = store
            .create_tenant(&CreateTenantPayload {
                room: "102".into(),
                name: "102".into(),
                electricity_rate: dec!(1),
                water_rate: dec!(4.5),
                rent: 800,
            })
            .await
            .unwrap();
        let service = BillingService::new(store.clone());
        (store, service, tenant.id)
    }

    fn reading(tenant_id: i64, year: i32, month: i32, electricity: Decimal, water: Decimal) -> SaveReadingPayload {
        SaveReadingPayload {
            tenant_id,
            year,
            month,
            electricity,
            water,
        }
    }

    #[tokio::test]
    async fn first_period_counts_from_zero() {
        let (_, svc, id) = setup().await;

        let saved = svc.save_reading(&reading(id, 2024, 1, dec!(10), dec!(2))).await.unwrap();

        assert_eq!(saved.previous, MeterReadings::default());
        assert_eq!(saved.usage, Usage { electricity: dec!(10), water: dec!(2) });
        assert_eq!(saved.record.total, dec!(824.5));
    }

    #[tokio::test]
    async fn uses_previous_month_across_year_boundary() {
        let (_, svc, id) = setup().await;
        svc.save_reading(&reading(id, 2023, 12, dec!(100), dec!(50))).await.unwrap();

        let saved = svc.save_reading(&reading(id, 2024, 1, dec!(130), dec!(55))).await.unwrap();

        assert_eq!(saved.usage, Usage { electricity: dec!(30), water: dec!(5) });
        assert_eq!(saved.record.electricity_fee, dec!(30));
        assert_eq!(saved.record.water_fee, dec!(22.5));
        assert_eq!(saved.record.total, dec!(858));
    }

    #[tokio::test]
    async fn resaving_a_period_keeps_one_record_and_created_at() {
        let (store, svc, id) = setup().await;

        let first = svc.save_reading(&reading(id, 2024, 5, dec!(10), dec!(2))).await.unwrap();
        let second = svc.save_reading(&reading(id, 2024, 5, dec!(20), dec!(3))).await.unwrap();

        let rows = store.list_records(&RecordFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].electricity, dec!(20));
        assert_eq!(rows[0].total, second.record.total);
        assert_eq!(second.record.created_at, first.record.created_at);
    }

    #[tokio::test]
    async fn reading_below_previous_month_is_rejected() {
        let (store, svc, id) = setup().await;
        svc.save_reading(&reading(id, 2024, 1, dec!(100), dec!(50))).await.unwrap();

        let err = svc.save_reading(&reading(id, 2024, 2, dec!(99), dec!(60))).await.unwrap_err();
        assert!(matches!(err, AppError::ReadingRegression { meter: Meter::Electricity, .. }));

        let err = svc.save_reading(&reading(id, 2024, 2, dec!(100), dec!(49))).await.unwrap_err();
        assert!(matches!(err, AppError::ReadingRegression { meter: Meter::Water, .. }));

        // Nada foi gravado para fevereiro
        let feb = store.find_record(id, Period::new(2024, 2).unwrap()).await.unwrap();
        assert!(feb.is_none());
    }

    #[tokio::test]
    async fn overflowing_amount_is_rejected_without_writing() {
        let store = Arc::new(MemoryBillingStore::new());
        let tenant = store
            .create_tenant(&CreateTenantPayload {
                room: "999".into(),
                name: "999".into(),
                electricity_rate: dec!(100000000000000000000),
                water_rate: dec!(4.5),
                rent: 800,
            })
            .await
            .unwrap();
        let svc = BillingService::new(store.clone());

        let err = svc
            .save_reading(&reading(tenant.id, 2024, 1, dec!(10000000000), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange { .. }));

        let saved = store.find_record(tenant.id, Period::new(2024, 1).unwrap()).await.unwrap();
        assert!(saved.is_none());
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let (_, svc, _) = setup().await;
        let err = svc.save_reading(&reading(999, 2024, 1, dec!(1), dec!(1))).await.unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound(999)));
    }

    #[tokio::test]
    async fn concurrent_saves_of_the_same_period_never_duplicate() {
        let (store, svc, id) = setup().await;

        let a = reading(id, 2024, 7, dec!(10), dec!(1));
        let b = reading(id, 2024, 7, dec!(20), dec!(2));
        let (ra, rb) = tokio::join!(svc.save_reading(&a), svc.save_reading(&b));
        let (ra, rb) = (ra.unwrap(), rb.unwrap());
        assert_eq!(ra.record.id, rb.record.id);

        let rows = store
            .list_records(&RecordFilter { tenant_id: Some(id), year: Some(2024), month: Some(7) })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        // O último a escrever vence
        let last = if rb.record.updated_at > ra.record.updated_at { rb } else { ra };
        assert_eq!(rows[0].electricity, last.record.electricity);
    }

    #[tokio::test]
    async fn previous_record_looks_one_month_back() {
        let (_, svc, id) = setup().await;
        svc.save_reading(&reading(id, 2024, 12, dec!(10), dec!(2))).await.unwrap();

        let prev = svc.previous_record(id, Period::new(2025, 1).unwrap()).await.unwrap();
        assert_eq!(prev.map(|r| (r.year, r.month)), Some((2024, 12)));

        let none = svc.previous_record(id, Period::new(2024, 12).unwrap()).await.unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn recent_limit_defaults_and_clamps() {
        assert_eq!(clamp_recent_limit(None), 5);
        assert_eq!(clamp_recent_limit(Some("abc")), 5);
        assert_eq!(clamp_recent_limit(Some("0")), 5);
        assert_eq!(clamp_recent_limit(Some("-3")), 1);
        assert_eq!(clamp_recent_limit(Some("12")), 12);
        assert_eq!(clamp_recent_limit(Some("500")), 50);
    }
}
