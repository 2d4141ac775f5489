//! Field-level validation for documents.
//!
//! A document's [`validate`](crate::document::Document::validate) implementation
//! runs a [`Validator`] over its fields. Every check records a [`FieldError`]
//! instead of stopping at the first failure, so a rejected write reports all of
//! its violations at once.
//!
//! Optional fields are passed as `Option`s; absent values are not checked.
//!
//! ```ignore
//! use kennel::validate::Validator;
//!
//! Validator::new()
//!     .required("name", &self.name)
//!     .range("age", self.age, 0.0, 50.0)
//!     .finish()
//! ```

use std::fmt;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A required text field is empty.
    Required,
    /// A number is `NaN` or infinite.
    NotANumber,
    /// A number is smaller than the allowed minimum.
    BelowMin { min: f64, actual: f64 },
    /// A number is larger than the allowed maximum.
    AboveMax { max: f64, actual: f64 },
    /// Text has fewer characters than allowed.
    TooShort { min_length: usize, actual: usize },
    /// Text has more characters than allowed.
    TooLong { max_length: usize, actual: usize },
    /// Text does not match the declared pattern.
    PatternMismatch { pattern: &'static str },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Required => write!(f, "is required"),
            Violation::NotANumber => write!(f, "is not a finite number"),
            Violation::BelowMin { min, actual } => {
                write!(f, "{actual} is less than the minimum allowed value ({min})")
            }
            Violation::AboveMax { max, actual } => {
                write!(f, "{actual} is more than the maximum allowed value ({max})")
            }
            Violation::TooShort { min_length, actual } => {
                write!(f, "is shorter than the minimum allowed length ({min_length}), got {actual}")
            }
            Violation::TooLong { max_length, actual } => {
                write!(f, "is longer than the maximum allowed length ({max_length}), got {actual}")
            }
            Violation::PatternMismatch { pattern } => write!(f, "does not match {pattern}"),
        }
    }
}

/// A violation bound to the field path it was found on (e.g. `age`, `toys.1`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub violation: Violation,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.field, self.violation)
    }
}

/// The non-empty set of violations that rejected a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// All recorded violations, in check order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `true` if `field` has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field violations.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: impl Into<String>, violation: Violation) {
        self.errors.push(FieldError { field: field.into(), violation });
    }

    /// Text must be present and non-empty.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.push(field, Violation::Required);
        }
        self
    }

    /// Number must be finite and lie in `min..=max`.
    pub fn range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) -> &mut Self {
        if let Some(actual) = value {
            if !actual.is_finite() {
                self.push(field, Violation::NotANumber);
            } else if actual < min {
                self.push(field, Violation::BelowMin { min, actual });
            } else if actual > max {
                self.push(field, Violation::AboveMax { max, actual });
            }
        }
        self
    }

    /// Text length must lie in the given bounds.
    ///
    /// Length is counted in UTF-16 code units, the way MongoDB ODMs count it, so
    /// an astral-plane character such as an emoji counts twice.
    pub fn length(
        &mut self,
        field: &str,
        value: Option<&str>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> &mut Self {
        if let Some(value) = value {
            let actual = value.encode_utf16().count();

            match (min_length, max_length) {
                (Some(min_length), _) if actual < min_length => {
                    self.push(field, Violation::TooShort { min_length, actual });
                }
                (_, Some(max_length)) if actual > max_length => {
                    self.push(field, Violation::TooLong { max_length, actual });
                }
                _ => {}
            }
        }
        self
    }

    /// Every item of a text array must have at least `min_length` code units.
    pub fn each_min_length<S: AsRef<str>>(
        &mut self,
        field: &str,
        values: &[S],
        min_length: usize,
    ) -> &mut Self {
        for (index, value) in values.iter().enumerate() {
            self.length(&format!("{field}.{index}"), Some(value.as_ref()), Some(min_length), None);
        }
        self
    }

    /// Text must satisfy `matcher`; `pattern` names the rule in error messages.
    pub fn matches(
        &mut self,
        field: &str,
        value: Option<&str>,
        pattern: &'static str,
        matcher: impl Fn(&str) -> bool,
    ) -> &mut Self {
        if let Some(value) = value {
            if !matcher(value) {
                self.push(field, Violation::PatternMismatch { pattern });
            }
        }
        self
    }

    /// Returns `Ok(())` if nothing was recorded.
    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors: std::mem::take(&mut self.errors) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation() {
        let errors = Validator::new()
            .required("name", "")
            .range("age", Some(51.0), 0.0, 50.0)
            .length("color", Some("re"), Some(3), Some(20))
            .finish()
            .unwrap_err();

        assert_eq!(errors.errors().len(), 3);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("age"));
        assert!(errors.has_field("color"));
    }

    #[test]
    fn absent_optional_values_pass() {
        assert!(
            Validator::new()
                .range("age", None, 0.0, 50.0)
                .length("color", None, Some(3), Some(20))
                .matches("country", None, "^[A-Z][A-Z]$", |_| false)
                .finish()
                .is_ok()
        );
    }

    #[test]
    fn range_is_inclusive() {
        for age in [0.0, 50.0] {
            assert!(Validator::new().range("age", Some(age), 0.0, 50.0).finish().is_ok());
        }
        assert_eq!(
            Validator::new()
                .range("age", Some(-1.0), 0.0, 50.0)
                .finish()
                .unwrap_err()
                .errors()[0]
                .violation,
            Violation::BelowMin { min: 0.0, actual: -1.0 }
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for age in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let errors = Validator::new()
                .range("age", Some(age), 0.0, 50.0)
                .finish()
                .unwrap_err();

            assert_eq!(errors.errors()[0].violation, Violation::NotANumber, "{age} should fail");
        }
    }

    #[test]
    fn length_counts_utf16_code_units() {
        assert!(
            Validator::new()
                .length("color", Some("été"), Some(3), Some(20))
                .finish()
                .is_ok()
        );
        assert_eq!(
            Validator::new()
                .length("color", Some("🐕🐕"), None, Some(3))
                .finish()
                .unwrap_err()
                .errors()[0]
                .violation,
            Violation::TooLong { max_length: 3, actual: 4 }
        );
    }

    #[test]
    fn array_items_are_reported_by_index() {
        let errors = Validator::new()
            .each_min_length("toys", &["ball", "x", "rope"], 2)
            .finish()
            .unwrap_err();

        assert!(errors.has_field("toys.1"));
        assert_eq!(errors.to_string(), "`toys.1` is shorter than the minimum allowed length (2), got 1");
    }
}
