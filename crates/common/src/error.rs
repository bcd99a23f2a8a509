//! Common error types shared across crates.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name → human-readable validation message.
///
/// A `BTreeMap` keeps the serialised `errors` object in a stable order.
pub type FieldErrors = BTreeMap<String, String>;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Validation`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Api`] → 400
/// - [`ServiceError::Unauthorized`] → 401
/// - [`ServiceError::Forbidden`] → 403
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// A looked-up resource does not exist.
    #[error("{resource} not found with {field}: {value}")]
    NotFound {
        /// Resource kind, e.g. `"Category"`.
        resource: &'static str,
        /// Lookup field, e.g. `"categoryId"`.
        field: &'static str,
        /// Rendered lookup value.
        value: String,
    },

    /// A business rule was violated (duplicate name, insufficient stock, ...).
    #[error("{0}")]
    Api(String),

    /// The caller is not authenticated or presented bad credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required role or ownership.
    #[error("{0}")]
    Forbidden(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Build a [`ServiceError::NotFound`] from any displayable lookup value.
    pub fn not_found(
        resource: &'static str,
        field: &'static str,
        value: impl std::fmt::Display,
    ) -> Self {
        ServiceError::NotFound {
            resource,
            field,
            value: value.to_string(),
        }
    }

    /// Build a [`ServiceError::Api`] from a message.
    pub fn api(message: impl Into<String>) -> Self {
        ServiceError::Api(message.into())
    }

    /// Build a single-field [`ServiceError::Validation`].
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), message.into());
        ServiceError::Validation(errors)
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound { .. } => 404,
            ServiceError::Api(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message that is safe to show to callers.
    ///
    /// Internal details are replaced by a generic message; they belong in logs.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Internal(_) => "internal server error".into(),
            other => other.to_string(),
        }
    }
}
