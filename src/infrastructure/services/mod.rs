//! Infrastructure services

mod registry_service;

pub use registry_service::{
    BackendStatus, Committed, RegisterModelRequest, RegistryService, UpdateModelRequest,
    ValidateModelRequest, NOT_INITIALIZED_DETAIL,
};
