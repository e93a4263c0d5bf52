//! Infrastructure layer - External service implementations

pub mod logging;
pub mod observability;
pub mod registry;
pub mod services;
