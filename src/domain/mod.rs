//! Domain layer - Core business logic and entities

pub mod error;
pub mod identity;
pub mod model;
pub mod registry;
pub mod validation;

pub use error::{DomainError, FieldError};
pub use identity::{Identity, SigningKey};
pub use model::{Model, ModelId, ModelValidationError};
pub use registry::{RegistryEvent, RegistryStore, TransactionReceipt};
pub use validation::Validation;
