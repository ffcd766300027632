pub mod store;
pub use store::BillingStore;
pub mod tenant_repo;
pub use tenant_repo::TenantRepository;
pub mod record_repo;
pub use record_repo::RecordRepository;
pub mod pg_store;
pub use pg_store::PgBillingStore;
pub mod memory_store;
pub use memory_store::MemoryBillingStore;
pub mod seed;
