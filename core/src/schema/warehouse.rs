//! Client warehouse (pickup location) registration and edits.

use serde::{Deserialize, Deserializer, Serialize};

use super::pincode::Pincode;
use super::validation::{self, ValidationError};

const DEFAULT_COUNTRY: &str = "India";

/// Unvalidated warehouse input, in provider field names.
///
/// Turned into a `WarehouseSpec` with `WarehouseSpec::new`; also the shape a
/// warehouse JSON document is decoded through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehouseFields {
    pub name: String,
    pub registered_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pin: String,
    #[serde(default)]
    pub country: Option<String>,
    pub phone: String,
    pub email: String,
    pub return_address: String,
    pub return_city: String,
    pub return_state: String,
    pub return_pin: String,
    #[serde(default)]
    pub return_country: Option<String>,
}

/// A validated warehouse registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WarehouseFields")]
pub struct WarehouseSpec {
    name: String,
    registered_name: String,
    address: String,
    city: String,
    state: String,
    pin: Pincode,
    country: String,
    phone: String,
    email: String,
    return_address: String,
    return_city: String,
    return_state: String,
    return_pin: Pincode,
    return_country: String,
}

impl WarehouseSpec {
    pub fn new(fields: WarehouseFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", fields.name)?,
            registered_name: validation::non_empty("registered_name", fields.registered_name)?,
            address: validation::non_empty("address", fields.address)?,
            city: validation::non_empty("city", fields.city)?,
            state: validation::non_empty("state", fields.state)?,
            pin: Pincode::for_field("pin", fields.pin)?,
            country: country("country", fields.country)?,
            phone: validation::phone("phone", fields.phone)?,
            email: validation::email("email", fields.email)?,
            return_address: validation::non_empty("return_address", fields.return_address)?,
            return_city: validation::non_empty("return_city", fields.return_city)?,
            return_state: validation::non_empty("return_state", fields.return_state)?,
            return_pin: Pincode::for_field("return_pin", fields.return_pin)?,
            return_country: country("return_country", fields.return_country)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registered_name(&self) -> &str {
        &self.registered_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn pin(&self) -> &Pincode {
        &self.pin
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn return_address(&self) -> &str {
        &self.return_address
    }

    pub fn return_city(&self) -> &str {
        &self.return_city
    }

    pub fn return_state(&self) -> &str {
        &self.return_state
    }

    pub fn return_pin(&self) -> &Pincode {
        &self.return_pin
    }

    pub fn return_country(&self) -> &str {
        &self.return_country
    }
}

impl TryFrom<WarehouseFields> for WarehouseSpec {
    type Error = ValidationError;

    fn try_from(fields: WarehouseFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

fn country(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(country) => validation::non_empty(field, country),
        None => Ok(DEFAULT_COUNTRY.to_string()),
    }
}

/// Partial edit of a registered warehouse, keyed by its name.
///
/// Only the fields that were set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseUpdate {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registered_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<Pincode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_pin: Option<Pincode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_country: Option<String>,
}

impl WarehouseUpdate {
    pub fn builder(name: impl Into<String>) -> WarehouseUpdateBuilder {
        WarehouseUpdateBuilder {
            name: name.into(),
            ..WarehouseUpdateBuilder::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn pin(&self) -> Option<&Pincode> {
        self.pin.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WarehouseUpdateBuilder {
    name: String,
    registered_name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pin: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    return_address: Option<String>,
    return_city: Option<String>,
    return_state: Option<String>,
    return_pin: Option<String>,
    return_country: Option<String>,
}

impl WarehouseUpdateBuilder {
    pub fn registered_name(mut self, value: impl Into<String>) -> Self {
        self.registered_name = Some(value.into());
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.address = Some(value.into());
        self
    }

    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = Some(value.into());
        self
    }

    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn pin(mut self, value: impl Into<String>) -> Self {
        self.pin = Some(value.into());
        self
    }

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn return_address(mut self, value: impl Into<String>) -> Self {
        self.return_address = Some(value.into());
        self
    }

    pub fn return_city(mut self, value: impl Into<String>) -> Self {
        self.return_city = Some(value.into());
        self
    }

    pub fn return_state(mut self, value: impl Into<String>) -> Self {
        self.return_state = Some(value.into());
        self
    }

    pub fn return_pin(mut self, value: impl Into<String>) -> Self {
        self.return_pin = Some(value.into());
        self
    }

    pub fn return_country(mut self, value: impl Into<String>) -> Self {
        self.return_country = Some(value.into());
        self
    }

    pub fn build(self) -> Result<WarehouseUpdate, ValidationError> {
        let update = WarehouseUpdate {
            name: validation::non_empty("name", self.name)?,
            registered_name: validation::optional_non_empty("registered_name", self.registered_name)?,
            address: validation::optional_non_empty("address", self.address)?,
            city: validation::optional_non_empty("city", self.city)?,
            state: validation::optional_non_empty("state", self.state)?,
            pin: self.pin.map(|p| Pincode::for_field("pin", p)).transpose()?,
            country: validation::optional_non_empty("country", self.country)?,
            phone: self.phone.map(|p| validation::phone("phone", p)).transpose()?,
            email: self.email.map(|e| validation::email("email", e)).transpose()?,
            return_address: validation::optional_non_empty("return_address", self.return_address)?,
            return_city: validation::optional_non_empty("return_city", self.return_city)?,
            return_state: validation::optional_non_empty("return_state", self.return_state)?,
            return_pin: self
                .return_pin
                .map(|p| Pincode::for_field("return_pin", p))
                .transpose()?,
            return_country: validation::optional_non_empty("return_country", self.return_country)?,
        };

        let sets_nothing = update.registered_name.is_none()
            && update.address.is_none()
            && update.city.is_none()
            && update.state.is_none()
            && update.pin.is_none()
            && update.country.is_none()
            && update.phone.is_none()
            && update.email.is_none()
            && update.return_address.is_none()
            && update.return_city.is_none()
            && update.return_state.is_none()
            && update.return_pin.is_none()
            && update.return_country.is_none();
        if sets_nothing {
            return Err(ValidationError::NothingToUpdate { target: "warehouse" });
        }
        Ok(update)
    }
}

/// Provider acknowledgement for warehouse create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseAck {
    pub success: bool,
    #[serde(default)]
    pub data: Option<WarehouseAckData>,
    #[serde(default, deserialize_with = "messages")]
    pub error: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseAckData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `error` arrives as null, a string, or a list of strings.
pub(crate) fn messages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Messages {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Messages>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Messages::One(message)) if message.is_empty() => Vec::new(),
        Some(Messages::One(message)) => vec![message],
        Some(Messages::Many(messages)) => messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> WarehouseFields {
        WarehouseFields {
            name: "BLR-Main".to_string(),
            registered_name: "Acme Retail Pvt Ltd".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pin: "560001".to_string(),
            country: None,
            phone: "9876543210".to_string(),
            email: "ops@acme.example.in".to_string(),
            return_address: "12 MG Road".to_string(),
            return_city: "Bengaluru".to_string(),
            return_state: "Karnataka".to_string(),
            return_pin: "560001".to_string(),
            return_country: None,
        }
    }

    #[test]
    fn defaults_country_to_india() {
        let spec = WarehouseSpec::new(fields()).unwrap();
        assert_eq!(spec.country(), "India");
        assert_eq!(spec.return_country(), "India");
    }

    #[test]
    fn rejects_bad_return_pin_by_name() {
        let mut input = fields();
        input.return_pin = "5600".to_string();
        let err = WarehouseSpec::new(input).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidPincode {
                field: "return_pin",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_email_and_phone() {
        let mut input = fields();
        input.email = "ops.acme.example".to_string();
        assert!(matches!(
            WarehouseSpec::new(input).unwrap_err(),
            ValidationError::InvalidEmail { field: "email", .. }
        ));

        let mut input = fields();
        input.phone = "12345".to_string();
        assert!(matches!(
            WarehouseSpec::new(input).unwrap_err(),
            ValidationError::InvalidPhone { field: "phone", .. }
        ));
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let spec = WarehouseSpec::new(fields()).unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["registered_name"], "Acme Retail Pvt Ltd");
        assert_eq!(json["pin"], "560001");
        assert_eq!(json["return_pin"], "560001");
        assert_eq!(json["country"], "India");
    }

    #[test]
    fn round_trips_through_json() {
        let spec = WarehouseSpec::new(fields()).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let back: WarehouseSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn decoding_revalidates() {
        let json = r#"{"name":"X","registered_name":"X","address":"A","city":"C","state":"S",
            "pin":"56000","phone":"9876543210","email":"a@b.in","return_address":"A",
            "return_city":"C","return_state":"S","return_pin":"560001"}"#;
        assert!(serde_json::from_str::<WarehouseSpec>(json).is_err());
    }

    #[test]
    fn identical_inputs_build_equal_values() {
        assert_eq!(
            WarehouseSpec::new(fields()).unwrap(),
            WarehouseSpec::new(fields()).unwrap()
        );
    }

    #[test]
    fn update_sends_only_set_fields() {
        let update = WarehouseUpdate::builder("BLR-Main")
            .phone("9123456780")
            .build()
            .unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "BLR-Main", "phone": "9123456780"}));
    }

    #[test]
    fn update_with_nothing_set_is_rejected() {
        let err = WarehouseUpdate::builder("BLR-Main").build().unwrap_err();
        assert_eq!(err, ValidationError::NothingToUpdate { target: "warehouse" });
    }

    #[test]
    fn update_can_change_countries_alone() {
        let update = WarehouseUpdate::builder("BLR-Main")
            .country("Nepal")
            .return_country(" Bhutan ")
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"name": "BLR-Main", "country": "Nepal", "return_country": "Bhutan"})
        );
        assert!(WarehouseUpdate::builder("BLR-Main").return_country("India").build().is_ok());

        let err = WarehouseUpdate::builder("BLR-Main").country("  ").build().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "country" });
    }

    #[test]
    fn update_validates_supplied_fields() {
        let err = WarehouseUpdate::builder("BLR-Main")
            .pin("ABCDEF")
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPincode { field: "pin", .. }));
    }

    #[test]
    fn ack_accepts_string_or_list_errors() {
        let ack: WarehouseAck =
            serde_json::from_str(r#"{"success":false,"error":"duplicate name"}"#).unwrap();
        assert_eq!(ack.error, vec!["duplicate name"]);

        let ack: WarehouseAck = serde_json::from_str(
            r#"{"success":true,"data":{"name":"BLR-Main","message":"created"},"error":null}"#,
        )
        .unwrap();
        assert!(ack.success);
        assert!(ack.error.is_empty());
        assert_eq!(ack.data.unwrap().name.as_deref(), Some("BLR-Main"));
    }
}
