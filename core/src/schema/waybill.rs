use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Provider-assigned shipment identifier.
///
/// Waybills are joined with commas in query strings, so only ASCII
/// alphanumerics are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Waybill(String);

impl Waybill {
    pub const FIELD: &'static str = "waybill";
    const MIN_LEN: usize = 8;
    const MAX_LEN: usize = 32;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let valid = (Self::MIN_LEN..=Self::MAX_LEN).contains(&trimmed.len())
            && trimmed.bytes().all(|b| b.is_ascii_alphanumeric());
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidWaybill {
                field: Self::FIELD,
                value,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Waybill {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Waybill> for String {
    fn from(waybill: Waybill) -> Self {
        waybill.0
    }
}

impl fmt::Display for Waybill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn join(waybills: &[Waybill]) -> String {
    waybills
        .iter()
        .map(Waybill::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_provider_waybills() {
        assert_eq!(Waybill::new("1234567890123").unwrap().as_str(), "1234567890123");
        assert_eq!(Waybill::new(" 98765432 ").unwrap().as_str(), "98765432");
    }

    #[test]
    fn rejects_short_or_separator_bearing_values() {
        assert!(Waybill::new("1234567").is_err());
        assert!(Waybill::new("12345678,9").is_err());
        assert!(Waybill::new("").is_err());
        assert!(Waybill::new("1".repeat(33)).is_err());
    }

    #[test]
    fn join_uses_commas() {
        let wbns = vec![
            Waybill::new("11111111").unwrap(),
            Waybill::new("22222222").unwrap(),
        ];
        assert_eq!(join(&wbns), "11111111,22222222");
    }
}
