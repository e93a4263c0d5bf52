//! Registry domain - Store abstraction, events and receipts

mod event;
mod store;

pub use event::{RegistryEvent, TransactionReceipt};
pub use store::RegistryStore;

#[cfg(test)]
pub use store::MockRegistryStore;
