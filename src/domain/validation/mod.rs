//! Validation domain - Reviewer attestations about registered models

mod entity;

pub use entity::Validation;
