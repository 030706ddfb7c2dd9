//! Pincodes and the serviceability check.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Six-digit Indian postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(String);

impl Pincode {
    pub const FIELD: &'static str = "pincode";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::for_field(Self::FIELD, value)
    }

    /// Validate under another field name (`pin`, `return_pin`, `o_pin`, ...).
    pub(crate) fn for_field(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidPincode { field, value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pincode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pincode> for String {
    fn from(pin: Pincode) -> Self {
        pin.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serviceability lookup for one pincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PincodeQuery {
    pincode: Pincode,
}

impl PincodeQuery {
    pub fn new(pincode: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            pincode: Pincode::new(pincode)?,
        })
    }

    pub fn pincode(&self) -> &Pincode {
        &self.pincode
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        vec![("filter_codes".to_string(), self.pincode.to_string())]
    }
}

impl From<Pincode> for PincodeQuery {
    fn from(pincode: Pincode) -> Self {
        Self { pincode }
    }
}

/// Serviceability of one pincode.
///
/// A pincode the provider does not deliver to comes back with
/// `serviceable == false` and every capability flag off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PincodeResult {
    pub pincode: Pincode,
    pub serviceable: bool,
    pub supports_cod: bool,
    pub supports_prepaid: bool,
    pub supports_pickup: bool,
    /// Out of delivery area: deliverable, with surcharge and longer transit.
    pub is_oda: bool,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state_code: Option<String>,
    /// Code of the first delivery center matched to the pincode.
    pub center_code: Option<String>,
}

impl PincodeResult {
    pub(crate) fn from_wire(queried: &Pincode, wire: PincodeWire) -> Self {
        let matched = wire
            .delivery_codes
            .iter()
            .map(|code| &code.postal_code)
            .find(|pc| pc.pin.as_digits() == queried.as_str())
            .or_else(|| wire.delivery_codes.first().map(|code| &code.postal_code));

        match matched {
            Some(pc) => Self {
                pincode: queried.clone(),
                serviceable: true,
                supports_cod: flag(&pc.cod) || flag(&pc.cash),
                supports_prepaid: flag(&pc.pre_paid),
                supports_pickup: flag(&pc.pickup),
                is_oda: flag(&pc.is_oda),
                city: pc.city.clone(),
                district: pc.district.clone(),
                state_code: pc.state_code.clone(),
                center_code: pc.center.iter().find_map(|c| c.code.clone()),
            },
            None => Self {
                pincode: queried.clone(),
                serviceable: false,
                supports_cod: false,
                supports_prepaid: false,
                supports_pickup: false,
                is_oda: false,
                city: None,
                district: None,
                state_code: None,
                center_code: None,
            },
        }
    }
}

fn flag(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("y"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PincodeWire {
    #[serde(default)]
    delivery_codes: Vec<DeliveryCodeWire>,
}

#[derive(Debug, Deserialize)]
struct DeliveryCodeWire {
    postal_code: PostalCodeWire,
}

#[derive(Debug, Deserialize)]
struct PostalCodeWire {
    pin: PinWire,
    city: Option<String>,
    district: Option<String>,
    state_code: Option<String>,
    cod: Option<String>,
    cash: Option<String>,
    pre_paid: Option<String>,
    pickup: Option<String>,
    is_oda: Option<String>,
    #[serde(default)]
    center: Vec<CenterWire>,
}

#[derive(Debug, Deserialize)]
struct CenterWire {
    code: Option<String>,
}

/// The provider sends `pin` as a number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PinWire {
    Number(u64),
    Text(String),
}

impl PinWire {
    fn as_digits(&self) -> String {
        match self {
            PinWire::Number(n) => format!("{n:06}"),
            PinWire::Text(s) => s.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn decode(body: &str) -> PincodeWire {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn rejects_wrong_length_and_non_digits() {
        for bad in ["", "12345", "1234567", "56000a", " 56000", "560 01", "５６０００１"] {
            let err = PincodeQuery::new(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidPincode { field: "pincode", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn serde_rejects_invalid_pincode() {
        assert!(serde_json::from_str::<Pincode>(r#""560001""#).is_ok());
        assert!(serde_json::from_str::<Pincode>(r#""56001""#).is_err());
    }

    #[test]
    fn serviceable_pincode_with_cash_flag_supports_cod() {
        let query = PincodeQuery::new("560001").unwrap();
        let wire = decode(
            r#"{"delivery_codes":[{"postal_code":{"pin":"560001","pre_paid":"Y","cash":"Y"}}]}"#,
        );
        let result = PincodeResult::from_wire(query.pincode(), wire);
        assert!(result.serviceable);
        assert!(result.supports_cod);
        assert!(result.supports_prepaid);
        assert!(!result.is_oda);
    }

    #[test]
    fn numeric_pin_and_center_code_are_read() {
        let query = PincodeQuery::new("110001").unwrap();
        let wire = decode(
            r#"{"delivery_codes":[{"postal_code":{
                "pin":110001,"city":"New Delhi","district":"Central Delhi","state_code":"DL",
                "cod":"N","pre_paid":"Y","pickup":"Y","is_oda":"N",
                "center":[{"code":"IND110037AAB","cn":"Delhi_Gateway"}]}}]}"#,
        );
        let result = PincodeResult::from_wire(query.pincode(), wire);
        assert!(result.serviceable);
        assert!(!result.supports_cod);
        assert!(result.supports_pickup);
        assert_eq!(result.city.as_deref(), Some("New Delhi"));
        assert_eq!(result.center_code.as_deref(), Some("IND110037AAB"));
    }

    #[test]
    fn empty_delivery_codes_is_not_serviceable() {
        let query = PincodeQuery::new("999999").unwrap();
        let result = PincodeResult::from_wire(query.pincode(), decode(r#"{"delivery_codes":[]}"#));
        assert!(!result.serviceable);
        assert!(!result.supports_cod);
        assert_eq!(result.pincode.as_str(), "999999");
    }

    proptest! {
        #[test]
        fn every_six_digit_string_is_accepted(pin in "[0-9]{6}") {
            let query = PincodeQuery::new(&pin).unwrap();
            prop_assert_eq!(query.pincode().as_str(), pin.as_str());
        }

        #[test]
        fn other_lengths_are_rejected(pin in "[0-9]{0,5}|[0-9]{7,12}") {
            prop_assert!(PincodeQuery::new(&pin).is_err());
        }

        #[test]
        fn any_non_digit_is_rejected(prefix in "[0-9]{0,5}", bad in "[^0-9]", suffix in "[0-9]{0,5}") {
            let candidate = format!("{prefix}{bad}{suffix}");
            prop_assert!(PincodeQuery::new(&candidate).is_err());
        }
    }
}
