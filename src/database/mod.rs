pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod storage;

pub use manager::DatabaseManager;
pub use memory::MemoryStorage;
pub use postgres::PgStorage;
pub use storage::{Collection, ReferenceField, Storage, StorageError};
