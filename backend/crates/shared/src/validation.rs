//! Request validation
//!
//! Collects every violated field of a payload so a single 400 response can
//! report all of them at once.

use crate::error::app_error::{AppError, AppResult, FieldViolation};

/// Accumulator for field-level validation results
///
/// ```rust
/// use kernel::validation::Violations;
/// use kernel::value_object::{display_name::DisplayName, email::Email};
///
/// let mut v = Violations::new();
/// let name = v.check("name", DisplayName::new("Al"));
/// let email = v.check("email", Email::new("al@example.com"));
/// assert!(name.is_none());
/// assert!(email.is_some());
/// assert!(v.finish().is_err());
/// ```
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a field validation, returning the value on success
    pub fn check<T>(&mut self, field: &'static str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(FieldViolation::new(field, err.message()));
                None
            }
        }
    }

    /// Record a violation directly
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a 400 carrying every violation
    pub fn finish(self) -> AppResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }

        let message = match self.0.as_slice() {
            [single] => single.message.clone(),
            _ => "Validation failed".to_string(),
        };

        Err(AppError::bad_request(message).with_violations(self.0))
    }

    /// Like [`finish`](Self::finish), yielding the assembled value on success
    pub fn finish_with<T>(self, value: Option<T>) -> AppResult<T> {
        self.finish()?;
        value.ok_or_else(|| AppError::bad_request("Validation failed"))
    }
}
