// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{BillingStore, MemoryBillingStore, PgBillingStore},
    services::{
        billing_service::BillingService, document_service::DocumentService,
        invoice_service::InvoiceService, tenant_service::TenantService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StorageKind::Postgres),
            "memory" | "mem" => Ok(StorageKind::Memory),
            other => anyhow::bail!("STORAGE inválido: '{other}' (use 'postgres' ou 'memory')"),
        }
    }
}

// Configuração lida do ambiente (.env é opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub cors_origin: String,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub seed_tenants: bool,
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} inválido ('{raw}'): {e}")),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            storage: env_or("STORAGE", StorageKind::Postgres)?,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            port: env_or("PORT", 8787)?,
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173".to_string())?,
            fonts_dir: env_or("FONTS_DIR", PathBuf::from("./fonts"))?,
            font_family: env_or("FONT_FAMILY", "NotoSansSC".to_string())?,
            seed_tenants: env_or("SEED_TENANTS", true)?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BillingStore>,
    pub tenant_service: TenantService,
    pub billing_service: BillingService,
    pub invoice_service: InvoiceService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn BillingStore> = match config.storage {
            StorageKind::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida quando STORAGE=postgres")?;

                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                // Schema antes de qualquer requisição
                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;

                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
                Arc::new(PgBillingStore::new(db_pool))
            }
            StorageKind::Memory => {
                tracing::warn!("Storage em memória: os dados somem quando o processo termina");
                Arc::new(MemoryBillingStore::new())
            }
        };

        Ok(Self::from_store(store, &config.fonts_dir, &config.font_family))
    }

    /// Monta o gráfico de dependências a partir de um storage já aberto.
    pub fn from_store(store: Arc<dyn BillingStore>, fonts_dir: &std::path::Path, font_family: &str) -> Self {
        Self {
            tenant_service: TenantService::new(store.clone()),
            billing_service: BillingService::new(store.clone()),
            invoice_service: InvoiceService::new(store.clone()),
            document_service: DocumentService::new(fonts_dir, font_family),
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kind_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!("postgres".parse::<StorageKind>().unwrap(), StorageKind::Postgres);
        assert!("sqlite".parse::<StorageKind>().is_err());
    }
}
