// src/db/seed.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::BillingStore,
    models::tenant::CreateTenantPayload,
};

// Quartos padrão do prédio: (quarto, aluguel)
const DEFAULT_ROOMS: [(&str, i64); 11] = [
    ("102", 800),
    ("201", 620),
    ("202", 520),
    ("203", 520),
    ("204", 620),
    ("301", 620),
    ("302", 520),
    ("303", 520),
    ("304", 620),
    ("401", 620),
    ("402", 520),
];

/// Cadastra os inquilinos padrão se a tabela estiver vazia.
/// Retorna quantos foram criados.
pub async fn seed_tenants_if_empty(store: &dyn BillingStore) -> Result<usize, AppError> {
    if store.count_tenants().await? > 0 {
        return Ok(0);
    }

    for (room, rent) in DEFAULT_ROOMS {
        store
            .create_tenant(&CreateTenantPayload {
                room: room.to_string(),
                name: room.to_string(),
                electricity_rate: Decimal::ONE,
                water_rate: Decimal::new(45, 1),
                rent,
            })
            .await?;
    }

    tracing::info!("🌱 {} inquilinos padrão cadastrados", DEFAULT_ROOMS.len());
    Ok(DEFAULT_ROOMS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBillingStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn seeds_only_an_empty_table() {
        let store = MemoryBillingStore::new();

        assert_eq!(seed_tenants_if_empty(&store).await.unwrap(), 11);
        assert_eq!(seed_tenants_if_empty(&store).await.unwrap(), 0);

        let tenants = store.list_tenants().await.unwrap();
        assert_eq!(tenants.len(), 11);
        assert_eq!(tenants[0].room, "102");
        assert_eq!(tenants[0].rent, 800);
        assert!(tenants.iter().all(|t| t.water_rate == dec!(4.5) && t.electricity_rate == dec!(1)));
    }
}
