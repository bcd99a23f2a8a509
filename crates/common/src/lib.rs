//! Common types, transfer objects, and errors shared across `storefront-svc` crates.

pub mod error;
pub mod protocol;
pub mod validate;

pub use error::{FieldErrors, ServiceError};
pub use validate::Validate;
