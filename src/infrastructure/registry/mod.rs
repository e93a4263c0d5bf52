//! Registry store implementations

mod factory;
mod in_memory;
mod postgres;

pub use factory::{RegistryStoreFactory, StoreConfig, StoreType};
pub use in_memory::InMemoryRegistryStore;
pub use postgres::{PostgresConfig, PostgresRegistryStore};
