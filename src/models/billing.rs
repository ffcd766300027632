// src/models/billing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{
    period::Period,
    tenant::{validate_not_negative, Tenant},
};

// ---
// 1. BillingRecord (Uma linha por inquilino/ano/mês)
// ---
// As leituras são cumulativas; fees e total são valores calculados
// que são reescritos a cada gravação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    pub id: i64,
    pub tenant_id: i64,

    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: i32,

    #[schema(example = 130)]
    pub electricity: Decimal,
    #[schema(example = 55)]
    pub water: Decimal,

    #[schema(example = 30)]
    pub electricity_fee: Decimal,
    #[schema(example = 22.5)]
    pub water_fee: Decimal,
    #[schema(example = 858)]
    pub total: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingRecord {
    pub fn readings(&self) -> MeterReadings {
        MeterReadings {
            electricity: self.electricity,
            water: self.water,
        }
    }
}

// ---
// 2. Leituras e consumo
// ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeterReadings {
    pub electricity: Decimal,
    pub water: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub electricity: Decimal,
    pub water: Decimal,
}

// ---
// 3. Resultado do cálculo
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputedBill {
    pub electricity_usage: Decimal,
    pub water_usage: Decimal,
    pub electricity_fee: Decimal,
    pub water_fee: Decimal,
    pub total: Decimal,
}

// O que o storage precisa para gravar (upsert) um registro
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpsert {
    pub tenant_id: i64,
    pub period: Period,
    pub readings: MeterReadings,
    pub bill: ComputedBill,
}

// ---
// 4. Linhas de listagem (JOIN com tenants)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: i64,
    pub tenant_id: i64,
    pub room: String,
    pub name: String,
    pub rent: i64,
    pub electricity_rate: Decimal,
    pub water_rate: Decimal,
    pub year: i32,
    pub month: i32,
    pub electricity: Decimal,
    pub water: Decimal,
    pub electricity_fee: Decimal,
    pub water_fee: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordRow {
    pub fn from_parts(record: &BillingRecord, tenant: &Tenant) -> Self {
        Self {
            id: record.id,
            tenant_id: record.tenant_id,
            room: tenant.room.clone(),
            name: tenant.name.clone(),
            rent: tenant.rent,
            electricity_rate: tenant.electricity_rate,
            water_rate: tenant.water_rate,
            year: record.year,
            month: record.month,
            electricity: record.electricity,
            water: record.water,
            electricity_fee: record.electricity_fee,
            water_fee: record.water_fee,
            total: record.total,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentRecord {
    pub id: i64,
    pub tenant_id: i64,
    pub room: String,
    pub name: String,
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Filtros opcionais do GET /records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub tenant_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<i32>,
}

// ---
// 5. Payload do PUT /records
// ---
// Fees e total NÃO vêm do cliente: são sempre recalculados.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveReadingPayload {
    #[validate(range(min = 1, message = "tenantId must be positive"))]
    #[schema(example = 1)]
    pub tenant_id: i64,

    #[validate(range(min = 1970, max = 3000, message = "year must be between 1970 and 3000"))]
    #[schema(example = 2024)]
    pub year: i32,

    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    #[schema(example = 3)]
    pub month: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 130)]
    pub electricity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 55)]
    pub water: Decimal,
}

// Resposta do PUT /records
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedReading {
    pub record: BillingRecord,
    pub previous: MeterReadings,
    pub usage: Usage,
}

// ---
// 6. Visão da fatura (somente leitura)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub tenant: Tenant,
    pub record: Option<BillingRecord>,
    pub previous: Option<BillingRecord>,
    pub usage: Usage,
}
