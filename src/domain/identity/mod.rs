//! Identity domain - Caller identities and signing keys

mod entity;

pub use entity::{Identity, SigningKey};
