// src/db/memory_store.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::{
    common::error::AppError,
    db::store::BillingStore,
    models::{
        billing::{BillingRecord, RecentRecord, RecordFilter, RecordRow, RecordUpsert},
        period::Period,
        tenant::{compare_rooms, CreateTenantPayload, Tenant, UpdateTenantPayload},
    },
};

#[derive(Default)]
struct MemoryState {
    last_tenant_id: i64,
    last_record_id: i64,
    last_write: Option<DateTime<Utc>>,
    tenants: BTreeMap<i64, Tenant>,
    records: BTreeMap<(i64, Period), BillingRecord>,
}

impl MemoryState {
    // Relógio estritamente crescente (resolução de microssegundos, como o timestamptz)
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = match self.last_write {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_write = Some(now);
        now
    }
}

/// Storage em memória (testes e `STORAGE=memory`).
///
/// Vive só enquanto o processo vive: nada é gravado em disco.
/// Todas as operações seguram o mesmo lock, o que torna o upsert atômico.
#[derive(Default)]
pub struct MemoryBillingStore {
    state: Mutex<MemoryState>,
}

impl MemoryBillingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillingStore for MemoryBillingStore {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        let state = self.state.lock().await;
        let mut tenants: Vec<Tenant> = state.tenants.values().cloned().collect();
        tenants.sort_by(|a, b| compare_rooms(&a.room, &b.room));
        Ok(tenants)
    }

    async fn find_tenant(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        Ok(self.state.lock().await.tenants.get(&id).cloned())
    }

    async fn count_tenants(&self) -> Result<i64, AppError> {
        Ok(self.state.lock().await.tenants.len() as i64)
    }

    async fn create_tenant(&self, input: &CreateTenantPayload) -> Result<Tenant, AppError> {
        let mut state = self.state.lock().await;
        let created_at = state.tick();
        state.last_tenant_id += 1;

        let tenant = Tenant {
            id: state.last_tenant_id,
            room: input.room.clone(),
            name: input.name.clone(),
            electricity_rate: input.electricity_rate,
            water_rate: input.water_rate,
            rent: input.rent,
            created_at,
        };
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn update_tenant(&self, id: i64, patch: &UpdateTenantPayload) -> Result<Option<Tenant>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.tenants.get_mut(&id).map(|tenant| {
            patch.apply_to(tenant);
            tenant.clone()
        }))
    }

    async fn delete_tenant(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        if state.tenants.remove(&id).is_none() {
            return Ok(false);
        }
        // Cascata
        state.records.retain(|(tenant_id, _), _| *tenant_id != id);
        Ok(true)
    }

    async fn find_record(&self, tenant_id: i64, period: Period) -> Result<Option<BillingRecord>, AppError> {
        Ok(self.state.lock().await.records.get(&(tenant_id, period)).cloned())
    }

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordRow>, AppError> {
        let state = self.state.lock().await;

        let mut rows: Vec<RecordRow> = state
            .records
            .values()
            .filter(|r| filter.tenant_id.is_none_or(|id| r.tenant_id == id))
            .filter(|r| filter.year.is_none_or(|y| r.year == y))
            .filter(|r| filter.month.is_none_or(|m| r.month == m))
            .filter_map(|r| state.tenants.get(&r.tenant_id).map(|t| RecordRow::from_parts(r, t)))
            .collect();

        rows.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(b.month.cmp(&a.month))
                .then_with(|| compare_rooms(&a.room, &b.room))
        });
        Ok(rows)
    }

    async fn recent_records(&self, limit: i64) -> Result<Vec<RecentRecord>, AppError> {
        let state = self.state.lock().await;

        let mut records: Vec<&BillingRecord> = state.records.values().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        let rows = records
            .into_iter()
            .filter_map(|r| {
                state.tenants.get(&r.tenant_id).map(|t| RecentRecord {
                    id: r.id,
                    tenant_id: r.tenant_id,
                    room: t.room.clone(),
                    name: t.name.clone(),
                    year: r.year,
                    month: r.month,
                    total: r.total,
                    updated_at: r.updated_at,
                })
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok(rows)
    }

    async fn upsert_record(&self, input: &RecordUpsert) -> Result<BillingRecord, AppError> {
        let mut state = self.state.lock().await;

        // Mesmo papel da foreign key do Postgres
        if !state.tenants.contains_key(&input.tenant_id) {
            return Err(AppError::TenantNotFound(input.tenant_id));
        }

        let now = state.tick();
        let key = (input.tenant_id, input.period);

        let record = match state.records.get(&key).cloned() {
            Some(existing) => BillingRecord {
                electricity: input.readings.electricity,
                water: input.readings.water,
                electricity_fee: input.bill.electricity_fee,
                water_fee: input.bill.water_fee,
                total: input.bill.total,
                updated_at: now,
                ..existing
            },
            None => {
                state.last_record_id += 1;
                BillingRecord {
                    id: state.last_record_id,
                    tenant_id: input.tenant_id,
                    year: input.period.year(),
                    month: input.period.month(),
                    electricity: input.readings.electricity,
                    water: input.readings.water,
                    electricity_fee: input.bill.electricity_fee,
                    water_fee: input.bill.water_fee,
                    total: input.bill.total,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        state.records.insert(key, record.clone());
        Ok(record)
    }
}
