//! Error handling for the riddler game core.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, InfraErrorKind, StateErrorKind, ERROR_MARKER};
pub use error_code::ErrorCode;
