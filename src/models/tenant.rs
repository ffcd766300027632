// src/models/tenant.rs

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// ---
// 1. Tenant (O "Inquilino" + a sua tabela de tarifas)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "102")]
    pub room: String,

    #[schema(example = "Zhang San")]
    pub name: String,

    #[schema(example = 1)]
    pub electricity_rate: Decimal,

    #[schema(example = 4.5)]
    pub water_rate: Decimal,

    #[schema(example = 800)]
    pub rent: i64,

    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn rate_card(&self) -> RateCard {
        RateCard {
            electricity_rate: self.electricity_rate,
            water_rate: self.water_rate,
            rent: self.rent,
        }
    }
}

// ---
// 2. RateCard (Só os parâmetros de cobrança)
// ---
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCard {
    pub electricity_rate: Decimal,
    pub water_rate: Decimal,
    pub rent: i64,
}

// ---
// Validação Customizada
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "room is required"))]
    #[schema(example = "305")]
    pub room: String,

    #[serde(default)]
    #[schema(example = "Li Si")]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 1.0)]
    pub electricity_rate: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 4.5)]
    pub water_rate: Decimal,

    #[validate(range(min = 0, message = "must not be negative"))]
    #[serde(default)]
    #[schema(example = 620)]
    pub rent: i64,
}

// PATCH: qualquer subconjunto dos campos
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantPayload {
    #[validate(length(min = 1, message = "room must not be empty"))]
    pub room: Option<String>,

    pub name: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub electricity_rate: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub water_rate: Option<Decimal>,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub rent: Option<i64>,
}

impl UpdateTenantPayload {
    /// Aplica o patch sobre o inquilino atual (campos ausentes ficam iguais).
    pub fn apply_to(&self, tenant: &mut Tenant) {
        if let Some(room) = &self.room {
            tenant.room = room.clone();
        }
        if let Some(name) = &self.name {
            tenant.name = name.clone();
        }
        if let Some(rate) = self.electricity_rate {
            tenant.electricity_rate = rate;
        }
        if let Some(rate) = self.water_rate {
            tenant.water_rate = rate;
        }
        if let Some(rent) = self.rent {
            tenant.rent = rent;
        }
    }
}

// ---
// Ordenação de quartos: numéricos primeiro (pelo valor), depois o resto, desempate lexical.
// O SQL do Postgres replica exatamente esta regra.
// ---
pub fn compare_rooms(a: &str, b: &str) -> Ordering {
    let key = |room: &str| -> Option<u64> {
        if !room.is_empty() && room.bytes().all(|c| c.is_ascii_digit()) {
            room.parse().ok()
        } else {
            None
        }
    };

    match (key(a), key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
