use super::Error;

/// Error when a value fails validation constraints.
#[derive(Debug)]
pub(super) struct ValidationError {
    field: Box<str>,
    kind: ValidationErrorKind,
}

#[derive(Debug)]
enum ValidationErrorKind {
    /// Required field is null or empty
    Required,

    /// String length constraint violation
    Length {
        value_len: usize,
        min: Option<usize>,
        max: Option<usize>,
    },

    /// Numeric range constraint violation
    Range {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "validation failed: `{}` ", self.field)?;

        match &self.kind {
            ValidationErrorKind::Required => f.write_str("is required"),
            ValidationErrorKind::Length {
                value_len,
                min,
                max,
            } => {
                // If min and max are the same, show exact length requirement
                if let (Some(min), Some(max)) = (min, max) {
                    if min == max {
                        return write!(
                            f,
                            "length {} does not match required length {}",
                            value_len, min
                        );
                    }
                }

                match (min, max) {
                    (Some(min), _) if value_len < min => {
                        write!(f, "length {} is too short (minimum: {})", value_len, min)
                    }
                    (_, Some(max)) if value_len > max => {
                        write!(f, "length {} is too long (maximum: {})", value_len, max)
                    }
                    _ => f.write_str("length constraint violation"),
                }
            }
            ValidationErrorKind::Range { value, min, max } => match (min, max) {
                (Some(min), _) if value < min => {
                    write!(f, "value {} is below the minimum {}", value, min)
                }
                (_, Some(max)) if value > max => {
                    write!(f, "value {} is above the maximum {}", value, max)
                }
                _ => f.write_str("range constraint violation"),
            },
        }
    }
}

impl Error {
    fn validation(field: &str, kind: ValidationErrorKind) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            field: field.into(),
            kind,
        }))
    }

    /// Creates a validation error for a required field holding no value.
    pub fn validation_required(field: impl AsRef<str>) -> Error {
        Error::validation(field.as_ref(), ValidationErrorKind::Required)
    }

    /// Creates a validation error for a string length constraint violation.
    pub fn validation_length(
        field: impl AsRef<str>,
        value_len: usize,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Error {
        Error::validation(
            field.as_ref(),
            ValidationErrorKind::Length {
                value_len,
                min,
                max,
            },
        )
    }

    /// Creates a validation error for a numeric range constraint violation.
    pub fn validation_range(
        field: impl AsRef<str>,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Error {
        Error::validation(field.as_ref(), ValidationErrorKind::Range { value, min, max })
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
