//! Field-level request validation.
//!
//! Request DTOs implement [`Validate`]; the HTTP layer calls it right after
//! JSON decoding so that services only ever see well-formed input. Failures
//! are collected per field into a [`FieldErrors`] map rather than stopping at
//! the first bad field.

use crate::error::{FieldErrors, ServiceError};

/// Implemented by every request body that carries field constraints.
pub trait Validate {
    /// Check all constraints, returning [`ServiceError::Validation`] on failure.
    fn validate(&self) -> Result<(), ServiceError>;
}

/// Accumulates field errors. The first failure recorded for a field wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_owned()).or_insert(message);
    }

    /// `value` must contain a non-whitespace character.
    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "must not be blank".into());
        }
        self
    }

    /// `value` must be non-blank and at least `min` characters long.
    /// Surrounding whitespace does not count.
    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        self.not_blank(field, value);
        if value.trim().chars().count() < min {
            self.fail(field, format!("must contain at least {min} characters"));
        }
        self
    }

    /// `value` must be non-blank and between `min` and `max` characters long,
    /// not counting surrounding whitespace.
    pub fn len_between(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        self.not_blank(field, value);
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.fail(field, format!("size must be between {min} and {max}"));
        }
        self
    }

    /// Inclusive numeric range check.
    pub fn range(&mut self, field: &str, value: f64, min: f64, max: f64) -> &mut Self {
        if !value.is_finite() || value < min || value > max {
            self.fail(field, format!("must be between {min} and {max}"));
        }
        self
    }

    pub fn at_least(&mut self, field: &str, value: i64, min: i64) -> &mut Self {
        if value < min {
            self.fail(field, format!("must be greater than or equal to {min}"));
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.fail(field, "must be greater than or equal to 0".into());
        }
        self
    }

    /// Loose structural email check: `local@domain.tld`, no whitespace.
    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.not_blank(field, value);
        if !looks_like_email(value) {
            self.fail(field, "must be a well-formed email address".into());
        }
        self
    }

    /// Finish, returning every collected error at once.
    pub fn finish(&mut self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
