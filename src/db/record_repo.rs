// src/db/record_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::pg_placeholders, error::AppError},
    models::{
        billing::{BillingRecord, RecentRecord, RecordFilter, RecordRow, RecordUpsert},
        period::Period,
    },
};

const RECORD_COLUMNS: &str = "id, tenant_id, year, month, electricity, water, \
                              electricity_fee, water_fee, total, created_at, updated_at";

#[derive(Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, tenant_id: i64, period: Period) -> Result<Option<BillingRecord>, AppError> {
        let sql = pg_placeholders(&format!(
            "SELECT {RECORD_COLUMNS} FROM billing_records WHERE tenant_id = ? AND year = ? AND month = ?"
        ));
        let record = sqlx::query_as::<_, BillingRecord>(&sql)
            .bind(tenant_id)
            .bind(period.year())
            .bind(period.month())
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn list(&self, filter: &RecordFilter) -> Result<Vec<RecordRow>, AppError> {
        let mut sql = String::from(
            r#"
            SELECT
                r.id, r.tenant_id,
                t.room, t.name, t.rent, t.electricity_rate, t.water_rate,
                r.year, r.month, r.electricity, r.water,
                r.electricity_fee, r.water_fee, r.total,
                r.created_at, r.updated_at
            FROM billing_records r
            JOIN tenants t ON t.id = r.tenant_id
            "#,
        );

        // Os filtros entram na mesma ordem dos binds abaixo
        let mut clauses = Vec::new();
        if filter.tenant_id.is_some() {
            clauses.push("r.tenant_id = ?");
        }
        if filter.year.is_some() {
            clauses.push("r.year = ?");
        }
        if filter.month.is_some() {
            clauses.push("r.month = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(
            " ORDER BY r.year DESC, r.month DESC, \
             (t.room ~ '^[0-9]+$') DESC, \
             CASE WHEN t.room ~ '^[0-9]+$' THEN t.room::numeric END ASC, \
             t.room ASC",
        );

        let sql = pg_placeholders(&sql);
        let mut query = sqlx::query_as::<_, RecordRow>(&sql);
        if let Some(tenant_id) = filter.tenant_id {
            query = query.bind(tenant_id);
        }
        if let Some(year) = filter.year {
            query = query.bind(year);
        }
        if let Some(month) = filter.month {
            query = query.bind(month);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentRecord>, AppError> {
        let sql = pg_placeholders(
            r#"
            SELECT r.id, r.tenant_id, t.room, t.name, r.year, r.month, r.total, r.updated_at
            FROM billing_records r
            JOIN tenants t ON t.id = r.tenant_id
            ORDER BY r.updated_at DESC, r.id DESC
            LIMIT ?
            "#,
        );
        let rows = sqlx::query_as::<_, RecentRecord>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// UPSERT (Insert or Update) na chave natural (tenant_id, year, month).
    /// O Postgres serializa conflitos na constraint UNIQUE, então não há linha duplicada.
    pub async fn upsert(&self, input: &RecordUpsert) -> Result<BillingRecord, AppError> {
        let sql = pg_placeholders(&format!(
            r#"
            INSERT INTO billing_records
                (tenant_id, year, month, electricity, water, electricity_fee, water_fee, total)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (tenant_id, year, month)
            DO UPDATE SET
                electricity = EXCLUDED.electricity,
                water = EXCLUDED.water,
                electricity_fee = EXCLUDED.electricity_fee,
                water_fee = EXCLUDED.water_fee,
                total = EXCLUDED.total,
                updated_at = NOW()
            RETURNING {RECORD_COLUMNS}
            "#
        ));
        let record = sqlx::query_as::<_, BillingRecord>(&sql)
            .bind(input.tenant_id)
            .bind(input.period.year())
            .bind(input.period.month())
            .bind(input.readings.electricity)
            .bind(input.readings.water)
            .bind(input.bill.electricity_fee)
            .bind(input.bill.water_fee)
            .bind(input.bill.total)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Inquilino apagado entre a leitura e a gravação
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::TenantNotFound(input.tenant_id);
                    }
                }
                AppError::from(e)
            })?;

        Ok(record)
    }
}
