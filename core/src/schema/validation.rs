use thiserror::Error;

/// Why a request value was rejected at construction time.
///
/// Every variant names the offending field (or fields, for cross-field
/// rules) by its provider wire name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be exactly 6 digits, got {value:?}")]
    InvalidPincode { field: &'static str, value: String },

    #[error("{field} must be a 10 digit phone number, got {value:?}")]
    InvalidPhone { field: &'static str, value: String },

    #[error("{field} is not a valid email address: {value:?}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("{field} must be 8-32 alphanumeric characters, got {value:?}")]
    InvalidWaybill { field: &'static str, value: String },

    #[error("{field} must match {expected}, got {value:?}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be one of {allowed}, got {value:?}")]
    NotAllowed {
        field: &'static str,
        allowed: &'static str,
        value: String,
    },

    #[error("{field} must hold {min}..={max} items, got {actual}")]
    Count {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{field} is in the past: {value}")]
    InPast { field: &'static str, value: String },

    #[error("{}: {rule}", .fields.join(", "))]
    CrossField {
        fields: &'static [&'static str],
        rule: &'static str,
    },

    #[error("{target} update sets no fields")]
    NothingToUpdate { target: &'static str },

    #[error("request could not be encoded: {reason}")]
    Encoding { reason: String },
}

impl ValidationError {
    /// Fields implicated by this error. Empty for `Encoding`.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Empty { field }
            | ValidationError::InvalidPincode { field, .. }
            | ValidationError::InvalidPhone { field, .. }
            | ValidationError::InvalidEmail { field, .. }
            | ValidationError::InvalidWaybill { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotPositive { field }
            | ValidationError::Negative { field }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Count { field, .. }
            | ValidationError::InPast { field, .. } => vec![*field],
            ValidationError::CrossField { fields, .. } => fields.to_vec(),
            ValidationError::NothingToUpdate { target } => vec![*target],
            ValidationError::Encoding { .. } => Vec::new(),
        }
    }
}

/// Trimmed, non-empty text.
pub(crate) fn non_empty(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_non_empty(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    value.map(|v| non_empty(field, v)).transpose()
}

/// Ten-digit national number. A leading `+91` or `0` trunk prefix is
/// accepted and stripped.
pub(crate) fn phone(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    let national = trimmed
        .strip_prefix("+91")
        .or_else(|| trimmed.strip_prefix('0').filter(|rest| rest.len() == 10))
        .unwrap_or(trimmed);
    if national.len() == 10 && national.bytes().all(|b| b.is_ascii_digit()) {
        Ok(national.to_string())
    } else {
        Err(ValidationError::InvalidPhone { field, value })
    }
}

/// `local@domain.tld` with no whitespace and a dotted domain.
pub(crate) fn email(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !trimmed.chars().any(char::is_whitespace)
                && domain.split('.').count() >= 2
                && domain.split('.').all(|label| {
                    !label.is_empty()
                        && label
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-')
                })
        }
        None => false,
    };
    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidEmail { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("name", "  Main WH ").unwrap(), "Main WH");
        assert_eq!(
            non_empty("name", "   "),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn phone_accepts_ten_digits_and_known_prefixes() {
        assert_eq!(phone("phone", "9876543210").unwrap(), "9876543210");
        assert_eq!(phone("phone", "+919876543210").unwrap(), "9876543210");
        assert_eq!(phone("phone", "09876543210").unwrap(), "9876543210");
    }

    #[test]
    fn phone_rejects_short_or_non_numeric() {
        assert!(phone("phone", "98765").is_err());
        assert!(phone("phone", "98765432ab").is_err());
        assert!(phone("phone", "").is_err());
    }

    #[test]
    fn email_pattern() {
        assert!(email("email", "ops@example.in").is_ok());
        assert!(email("email", "first.last+wh@mail.example.com").is_ok());
        assert!(email("email", "no-at-sign.example.com").is_err());
        assert!(email("email", "a@b").is_err());
        assert!(email("email", "a b@example.com").is_err());
        assert!(email("email", "a@@example.com").is_err());
        assert!(email("email", "a@example..com").is_err());
    }

    #[test]
    fn cross_field_error_lists_every_field() {
        let err = ValidationError::CrossField {
            fields: &["payment_mode", "cod_amount"],
            rule: "COD shipments need a COD amount",
        };
        assert_eq!(err.fields(), vec!["payment_mode", "cod_amount"]);
        assert_eq!(
            err.to_string(),
            "payment_mode, cod_amount: COD shipments need a COD amount"
        );
    }
}
