// Service exports
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresClient;
pub use store::{ProfileStore, ShareStore, StoreError};
