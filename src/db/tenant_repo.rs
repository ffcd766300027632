// src/db/tenant_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::pg_placeholders, error::AppError},
    models::tenant::{CreateTenantPayload, Tenant, UpdateTenantPayload},
};

pub(crate) const TENANT_COLUMNS: &str =
    "id, room, name, electricity_rate, water_rate, rent, created_at";

// Quartos numéricos primeiro (pelo valor), depois o resto; desempate lexical.
pub(crate) const ROOM_ORDER: &str =
    "(room ~ '^[0-9]+$') DESC, CASE WHEN room ~ '^[0-9]+$' THEN room::numeric END ASC, room ASC";

// O repositório de inquilinos, responsável por todas as interações com a tabela 'tenants'
#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, AppError> {
        let sql = format!("SELECT {TENANT_COLUMNS} FROM tenants ORDER BY {ROOM_ORDER}");
        let tenants = sqlx::query_as::<_, Tenant>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(tenants)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        let sql = pg_placeholders(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"));
        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM tenants")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, input: &CreateTenantPayload) -> Result<Tenant, AppError> {
        // RETURNING devolve o id gerado, sem precisar de outra consulta
        let sql = pg_placeholders(&format!(
            r#"
            INSERT INTO tenants (room, name, electricity_rate, water_rate, rent)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {TENANT_COLUMNS}
            "#
        ));
        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(&input.room)
            .bind(&input.name)
            .bind(input.electricity_rate)
            .bind(input.water_rate)
            .bind(input.rent)
            .fetch_one(&self.pool)
            .await?;

        Ok(tenant)
    }

    pub async fn update(&self, id: i64, patch: &UpdateTenantPayload) -> Result<Option<Tenant>, AppError> {
        // Campos ausentes no patch chegam como NULL e o COALESCE mantém o valor atual
        let sql = pg_placeholders(&format!(
            r#"
            UPDATE tenants SET
                room = COALESCE(?, room),
                name = COALESCE(?, name),
                electricity_rate = COALESCE(?, electricity_rate),
                water_rate = COALESCE(?, water_rate),
                rent = COALESCE(?, rent)
            WHERE id = ?
            RETURNING {TENANT_COLUMNS}
            "#
        ));
        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(patch.room.as_deref())
            .bind(patch.name.as_deref())
            .bind(patch.electricity_rate)
            .bind(patch.water_rate)
            .bind(patch.rent)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        // ON DELETE CASCADE em billing_records leva os registros junto
        let result = sqlx::query(&pg_placeholders("DELETE FROM tenants WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
