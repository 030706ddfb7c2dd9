//! Forward shipments: CMU creation, edits and cancellation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pincode::Pincode;
use super::validation::{self, ValidationError};
use super::warehouse::messages;
use super::waybill::Waybill;

const DEFAULT_COUNTRY: &str = "India";

/// Caller-chosen order identifier. The provider rejects a second shipment
/// with the same reference, which makes creation idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderReference(String);

impl OrderReference {
    pub const FIELD: &'static str = "order";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(validation::non_empty(Self::FIELD, value)?))
    }

    /// A fresh random reference.
    pub fn generate() -> Self {
        Self::from(Uuid::new_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for OrderReference {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl TryFrom<String> for OrderReference {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderReference> for String {
    fn from(reference: OrderReference) -> Self {
        reference.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    Prepaid,
    #[serde(rename = "COD")]
    Cod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingMode {
    #[default]
    Surface,
    Express,
}

/// Unvalidated delivery address.
#[derive(Debug, Clone, Default)]
pub struct ConsigneeFields {
    pub name: String,
    pub address: String,
    pub pin: String,
    pub city: String,
    pub state: String,
    pub country: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consignee {
    name: String,
    address: String,
    pin: Pincode,
    city: String,
    state: String,
    country: String,
    phone: String,
}

impl Consignee {
    pub fn new(fields: ConsigneeFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", fields.name)?,
            address: validation::non_empty("add", fields.address)?,
            pin: Pincode::for_field("pin", fields.pin)?,
            city: validation::non_empty("city", fields.city)?,
            state: validation::non_empty("state", fields.state)?,
            country: match fields.country {
                Some(country) => validation::non_empty("country", country)?,
                None => DEFAULT_COUNTRY.to_string(),
            },
            phone: validation::phone("phone", fields.phone)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn pin(&self) -> &Pincode {
        &self.pin
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Where undeliverable parcels go, when it differs from the pickup warehouse.
#[derive(Debug, Clone, Default)]
pub struct ReturnAddressFields {
    pub address: String,
    pub pin: String,
    pub city: String,
    pub state: String,
    pub country: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnAddress {
    address: String,
    pin: Pincode,
    city: String,
    state: String,
    country: String,
    phone: String,
}

impl ReturnAddress {
    pub fn new(fields: ReturnAddressFields) -> Result<Self, ValidationError> {
        Ok(Self {
            address: validation::non_empty("return_add", fields.address)?,
            pin: Pincode::for_field("return_pin", fields.pin)?,
            city: validation::non_empty("return_city", fields.city)?,
            state: validation::non_empty("return_state", fields.state)?,
            country: match fields.country {
                Some(country) => validation::non_empty("return_country", country)?,
                None => DEFAULT_COUNTRY.to_string(),
            },
            phone: validation::phone("return_phone", fields.phone)?,
        })
    }

    pub fn pin(&self) -> &Pincode {
        &self.pin
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seller {
    name: String,
    address: Option<String>,
    invoice: Option<String>,
}

impl Seller {
    pub fn new(
        name: impl Into<String>,
        address: Option<String>,
        invoice: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("seller_name", name)?,
            address: validation::optional_non_empty("seller_add", address)?,
            invoice: validation::optional_non_empty("seller_inv", invoice)?,
        })
    }
}

/// Package size in centimetres. Unset sides are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageDimensions {
    pub length_cm: Option<u32>,
    pub width_cm: Option<u32>,
    pub height_cm: Option<u32>,
}

impl PackageDimensions {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, side) in [
            ("shipment_length", self.length_cm),
            ("shipment_width", self.width_cm),
            ("shipment_height", self.height_cm),
        ] {
            if side == Some(0) {
                return Err(ValidationError::NotPositive { field });
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.length_cm.is_none() && self.width_cm.is_none() && self.height_cm.is_none()
    }
}

/// A validated forward shipment, ready for CMU creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentOrder {
    order: OrderReference,
    consignee: Consignee,
    pickup_location: String,
    payment_mode: PaymentMode,
    shipping_mode: ShippingMode,
    declared_value: Decimal,
    cod_amount: Option<Decimal>,
    weight_grams: Option<u32>,
    dimensions: PackageDimensions,
    products_desc: Option<String>,
    quantity: Option<u32>,
    hsn_code: Option<String>,
    seller: Option<Seller>,
    return_address: Option<ReturnAddress>,
    waybill: Option<Waybill>,
}

impl ShipmentOrder {
    pub fn builder(
        order: OrderReference,
        consignee: ConsigneeFields,
        pickup_location: impl Into<String>,
    ) -> ShipmentOrderBuilder {
        ShipmentOrderBuilder {
            order,
            consignee,
            pickup_location: pickup_location.into(),
            payment_mode: PaymentMode::default(),
            shipping_mode: ShippingMode::default(),
            declared_value: None,
            cod_amount: None,
            weight_grams: None,
            dimensions: PackageDimensions::default(),
            products_desc: None,
            quantity: None,
            hsn_code: None,
            seller: None,
            return_address: None,
            waybill: None,
        }
    }

    pub fn order(&self) -> &OrderReference {
        &self.order
    }

    pub fn consignee(&self) -> &Consignee {
        &self.consignee
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn shipping_mode(&self) -> ShippingMode {
        self.shipping_mode
    }

    pub fn declared_value(&self) -> Decimal {
        self.declared_value
    }

    pub fn cod_amount(&self) -> Option<Decimal> {
        self.cod_amount
    }

    pub fn weight_grams(&self) -> Option<u32> {
        self.weight_grams
    }

    pub fn dimensions(&self) -> PackageDimensions {
        self.dimensions
    }

    /// The CMU form body: `format=json` and `data=<shipments document>`.
    pub(crate) fn cmu_form(&self) -> Result<Vec<(String, String)>, ValidationError> {
        let document = CmuDocument {
            shipments: vec![self.wire()],
            pickup_location: PickupLocationWire {
                name: &self.pickup_location,
            },
        };
        let data = serde_json::to_string(&document).map_err(|e| ValidationError::Encoding {
            reason: e.to_string(),
        })?;
        Ok(vec![
            ("format".to_string(), "json".to_string()),
            ("data".to_string(), data),
        ])
    }

    fn wire(&self) -> ShipmentWire<'_> {
        let seller = self.seller.as_ref();
        let ret = self.return_address.as_ref();
        ShipmentWire {
            name: &self.consignee.name,
            add: &self.consignee.address,
            pin: self.consignee.pin.as_str(),
            city: &self.consignee.city,
            state: &self.consignee.state,
            country: &self.consignee.country,
            phone: &self.consignee.phone,
            order: self.order.as_str(),
            payment_mode: self.payment_mode,
            shipping_mode: self.shipping_mode,
            total_amount: self.declared_value.to_string(),
            cod_amount: self.cod_amount.map(|amount| amount.to_string()),
            weight: self.weight_grams.map(|w| w.to_string()),
            shipment_length: self.dimensions.length_cm.map(|v| v.to_string()),
            shipment_width: self.dimensions.width_cm.map(|v| v.to_string()),
            shipment_height: self.dimensions.height_cm.map(|v| v.to_string()),
            products_desc: self.products_desc.as_deref(),
            quantity: self.quantity.map(|q| q.to_string()),
            hsn_code: self.hsn_code.as_deref(),
            seller_name: seller.map(|s| s.name.as_str()),
            seller_add: seller.and_then(|s| s.address.as_deref()),
            seller_inv: seller.and_then(|s| s.invoice.as_deref()),
            return_add: ret.map(|r| r.address.as_str()),
            return_pin: ret.map(|r| r.pin.as_str()),
            return_city: ret.map(|r| r.city.as_str()),
            return_state: ret.map(|r| r.state.as_str()),
            return_country: ret.map(|r| r.country.as_str()),
            return_phone: ret.map(|r| r.phone.as_str()),
            waybill: self.waybill.as_ref().map(Waybill::as_str),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShipmentOrderBuilder {
    order: OrderReference,
    consignee: ConsigneeFields,
    pickup_location: String,
    payment_mode: PaymentMode,
    shipping_mode: ShippingMode,
    declared_value: Option<Decimal>,
    cod_amount: Option<Decimal>,
    weight_grams: Option<u32>,
    dimensions: PackageDimensions,
    products_desc: Option<String>,
    quantity: Option<u32>,
    hsn_code: Option<String>,
    seller: Option<Seller>,
    return_address: Option<ReturnAddressFields>,
    waybill: Option<Waybill>,
}

impl ShipmentOrderBuilder {
    pub fn payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = mode;
        self
    }

    pub fn shipping_mode(mut self, mode: ShippingMode) -> Self {
        self.shipping_mode = mode;
        self
    }

    /// Invoice value of the contents, in rupees.
    pub fn declared_value(mut self, value: Decimal) -> Self {
        self.declared_value = Some(value);
        self
    }

    pub fn cod_amount(mut self, amount: Decimal) -> Self {
        self.cod_amount = Some(amount);
        self
    }

    pub fn weight_grams(mut self, grams: u32) -> Self {
        self.weight_grams = Some(grams);
        self
    }

    pub fn dimensions(mut self, dimensions: PackageDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn products_desc(mut self, desc: impl Into<String>) -> Self {
        self.products_desc = Some(desc.into());
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn hsn_code(mut self, code: impl Into<String>) -> Self {
        self.hsn_code = Some(code.into());
        self
    }

    pub fn seller(mut self, seller: Seller) -> Self {
        self.seller = Some(seller);
        self
    }

    pub fn return_address(mut self, address: ReturnAddressFields) -> Self {
        self.return_address = Some(address);
        self
    }

    /// Pre-fetched waybill to assign instead of letting the provider pick one.
    pub fn waybill(mut self, waybill: Waybill) -> Self {
        self.waybill = Some(waybill);
        self
    }

    pub fn build(self) -> Result<ShipmentOrder, ValidationError> {
        let consignee = Consignee::new(self.consignee)?;
        let pickup_location = validation::non_empty("pickup_location", self.pickup_location)?;

        let declared_value = self
            .declared_value
            .ok_or(ValidationError::Missing { field: "total_amount" })?;
        check_not_negative("total_amount", declared_value)?;
        check_cod(self.payment_mode, self.cod_amount, Some(declared_value))?;

        if self.weight_grams == Some(0) {
            return Err(ValidationError::NotPositive { field: "weight" });
        }
        self.dimensions.validate()?;
        if self.weight_grams.is_some() && self.dimensions.is_empty() {
            return Err(ValidationError::CrossField {
                fields: &["weight", "shipment_length", "shipment_width", "shipment_height"],
                rule: "a declared weight needs at least one package dimension",
            });
        }
        if self.quantity == Some(0) {
            return Err(ValidationError::NotPositive { field: "quantity" });
        }

        Ok(ShipmentOrder {
            order: self.order,
            consignee,
            pickup_location,
            payment_mode: self.payment_mode,
            shipping_mode: self.shipping_mode,
            declared_value,
            cod_amount: self.cod_amount,
            weight_grams: self.weight_grams,
            dimensions: self.dimensions,
            products_desc: validation::optional_non_empty("products_desc", self.products_desc)?,
            quantity: self.quantity,
            hsn_code: validation::optional_non_empty("hsn_code", self.hsn_code)?,
            seller: self.seller,
            return_address: self.return_address.map(ReturnAddress::new).transpose()?,
            waybill: self.waybill,
        })
    }
}

fn check_cod(
    mode: PaymentMode,
    cod_amount: Option<Decimal>,
    declared_value: Option<Decimal>,
) -> Result<(), ValidationError> {
    if let Some(amount) = cod_amount {
        check_not_negative("cod_amount", amount)?;
    }
    match (mode, cod_amount) {
        (PaymentMode::Cod, None) => Err(ValidationError::CrossField {
            fields: &["payment_mode", "cod_amount"],
            rule: "COD shipments need a COD amount",
        }),
        (PaymentMode::Cod, Some(amount)) => match declared_value {
            Some(value) if amount > value => Err(ValidationError::CrossField {
                fields: &["cod_amount", "total_amount"],
                rule: "COD amount cannot exceed the declared value",
            }),
            _ => Ok(()),
        },
        (PaymentMode::Prepaid, Some(amount)) if !amount.is_zero() => Err(ValidationError::CrossField {
            fields: &["payment_mode", "cod_amount"],
            rule: "prepaid shipments carry no COD amount",
        }),
        (PaymentMode::Prepaid, _) => Ok(()),
    }
}

#[derive(Serialize)]
struct CmuDocument<'a> {
    shipments: Vec<ShipmentWire<'a>>,
    pickup_location: PickupLocationWire<'a>,
}

#[derive(Serialize)]
struct PickupLocationWire<'a> {
    name: &'a str,
}

/// One CMU shipment. The provider expects every scalar as a string.
#[derive(Serialize)]
struct ShipmentWire<'a> {
    name: &'a str,
    add: &'a str,
    pin: &'a str,
    city: &'a str,
    state: &'a str,
    country: &'a str,
    phone: &'a str,
    order: &'a str,
    payment_mode: PaymentMode,
    shipping_mode: ShippingMode,
    total_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cod_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipment_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipment_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipment_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    products_desc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hsn_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seller_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seller_add: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seller_inv: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_add: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_pin: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waybill: Option<&'a str>,
}

/// CMU creation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub success: bool,
    #[serde(default)]
    pub upload_wbn: Option<String>,
    #[serde(default)]
    pub package_count: u32,
    #[serde(default)]
    pub packages: Vec<CreatedPackage>,
    #[serde(default)]
    pub cod_amount: Decimal,
    #[serde(default)]
    pub prepaid_count: u32,
    #[serde(default)]
    pub cod_count: u32,
    #[serde(default)]
    pub pickups_count: u32,
    #[serde(default)]
    pub replacement_count: u32,
    #[serde(default)]
    pub rmk: Option<String>,
}

impl OrderCreated {
    /// Waybills of the packages the provider accepted.
    pub fn waybills(&self) -> Vec<&str> {
        self.packages
            .iter()
            .filter(|p| p.is_success())
            .map(|p| p.waybill.as_str())
            .collect()
    }

    pub fn failed_packages(&self) -> Vec<&CreatedPackage> {
        self.packages.iter().filter(|p| !p.is_success()).collect()
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.failed_packages()
            .into_iter()
            .flat_map(|p| p.remarks.iter())
            .map(String::as_str)
            .filter(|remark| !remark.is_empty())
            .collect()
    }

    /// True when the upload succeeded and no package failed.
    pub fn is_complete(&self) -> bool {
        self.success && self.failed_packages().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPackage {
    /// `Success` or `Fail`.
    pub status: String,
    #[serde(default)]
    pub waybill: String,
    #[serde(default)]
    pub refnum: Option<String>,
    #[serde(default, deserialize_with = "messages")]
    pub remarks: Vec<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub sort_code: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
    #[serde(default)]
    pub cod_amount: Decimal,
    #[serde(default)]
    pub serviceable: Option<bool>,
}

impl CreatedPackage {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// One line of the order's contents, as sent with an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    name: String,
    sku: String,
    units: u32,
    selling_price: Decimal,
}

impl OrderItem {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        units: u32,
        selling_price: Decimal,
    ) -> Result<Self, ValidationError> {
        if units == 0 {
            return Err(ValidationError::NotPositive { field: "units" });
        }
        check_not_negative("selling_price", selling_price)?;
        Ok(Self {
            name: validation::non_empty("name", name)?,
            sku: validation::non_empty("sku", sku)?,
            units,
            selling_price,
        })
    }
}

/// Edit of a manifested shipment, keyed by the merchant order reference.
/// Only the fields that were set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    order: OrderReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    waybill: Option<Waybill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<Pincode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_pin: Option<Pincode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    products_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_mode: Option<PaymentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping_mode: Option<ShippingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cod_amount: Option<Decimal>,
    #[serde(rename = "weight", skip_serializing_if = "Option::is_none")]
    weight_grams: Option<u32>,
}

impl OrderUpdate {
    pub fn builder(order: OrderReference) -> OrderUpdateBuilder {
        OrderUpdateBuilder {
            order,
            waybill: None,
            name: None,
            phone: None,
            address: None,
            pin: None,
            city: None,
            state: None,
            country: None,
            return_address: None,
            return_pin: None,
            return_city: None,
            return_state: None,
            return_country: None,
            return_phone: None,
            products_desc: None,
            order_items: None,
            payment_mode: None,
            shipping_mode: None,
            total_amount: None,
            cod_amount: None,
            weight_grams: None,
        }
    }

    pub fn order(&self) -> &OrderReference {
        &self.order
    }

    pub fn waybill(&self) -> Option<&Waybill> {
        self.waybill.as_ref()
    }

    /// The CMU update body: `{"shipments": [<this update>]}`.
    pub(crate) fn cmu_document(&self) -> CmuUpdateDocument<'_> {
        CmuUpdateDocument { shipments: vec![self] }
    }

    fn sets_nothing(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.pin.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
            && self.return_address.is_none()
            && self.return_pin.is_none()
            && self.return_city.is_none()
            && self.return_state.is_none()
            && self.return_country.is_none()
            && self.return_phone.is_none()
            && self.products_desc.is_none()
            && self.order_items.is_none()
            && self.payment_mode.is_none()
            && self.shipping_mode.is_none()
            && self.total_amount.is_none()
            && self.cod_amount.is_none()
            && self.weight_grams.is_none()
    }
}

#[derive(Serialize)]
pub(crate) struct CmuUpdateDocument<'a> {
    shipments: Vec<&'a OrderUpdate>,
}

#[derive(Debug, Clone)]
pub struct OrderUpdateBuilder {
    order: OrderReference,
    waybill: Option<Waybill>,
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    pin: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    return_address: Option<String>,
    return_pin: Option<String>,
    return_city: Option<String>,
    return_state: Option<String>,
    return_country: Option<String>,
    return_phone: Option<String>,
    products_desc: Option<String>,
    order_items: Option<Vec<OrderItem>>,
    payment_mode: Option<PaymentMode>,
    shipping_mode: Option<ShippingMode>,
    total_amount: Option<Decimal>,
    cod_amount: Option<Decimal>,
    weight_grams: Option<u32>,
}

impl OrderUpdateBuilder {
    /// Pins the edit to one package of the order.
    pub fn waybill(mut self, waybill: Waybill) -> Self {
        self.waybill = Some(waybill);
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.address = Some(value.into());
        self
    }

    pub fn pin(mut self, value: impl Into<String>) -> Self {
        self.pin = Some(value.into());
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

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    pub fn return_address(mut self, value: impl Into<String>) -> Self {
        self.return_address = Some(value.into());
        self
    }

    pub fn return_pin(mut self, value: impl Into<String>) -> Self {
        self.return_pin = Some(value.into());
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

    pub fn return_country(mut self, value: impl Into<String>) -> Self {
        self.return_country = Some(value.into());
        self
    }

    pub fn return_phone(mut self, value: impl Into<String>) -> Self {
        self.return_phone = Some(value.into());
        self
    }

    pub fn products_desc(mut self, value: impl Into<String>) -> Self {
        self.products_desc = Some(value.into());
        self
    }

    /// Replaces the order's line items.
    pub fn order_items(mut self, items: Vec<OrderItem>) -> Self {
        self.order_items = Some(items);
        self
    }

    pub fn payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = Some(mode);
        self
    }

    pub fn shipping_mode(mut self, mode: ShippingMode) -> Self {
        self.shipping_mode = Some(mode);
        self
    }

    pub fn total_amount(mut self, amount: Decimal) -> Self {
        self.total_amount = Some(amount);
        self
    }

    pub fn cod_amount(mut self, amount: Decimal) -> Self {
        self.cod_amount = Some(amount);
        self
    }

    pub fn weight_grams(mut self, grams: u32) -> Self {
        self.weight_grams = Some(grams);
        self
    }

    pub fn build(self) -> Result<OrderUpdate, ValidationError> {
        if let Some(amount) = self.total_amount {
            check_not_negative("total_amount", amount)?;
        }
        if let Some(amount) = self.cod_amount {
            check_not_negative("cod_amount", amount)?;
        }
        if self.weight_grams == Some(0) {
            return Err(ValidationError::NotPositive { field: "weight" });
        }
        match self.payment_mode {
            Some(mode) => check_cod(mode, self.cod_amount, self.total_amount)?,
            None => {
                if let (Some(cod), Some(total)) = (self.cod_amount, self.total_amount) {
                    check_cod(PaymentMode::Cod, Some(cod), Some(total))?;
                }
            }
        }
        if self.order_items.as_ref().is_some_and(Vec::is_empty) {
            return Err(ValidationError::Empty { field: "order_items" });
        }

        let update = OrderUpdate {
            order: self.order,
            waybill: self.waybill,
            name: validation::optional_non_empty("name", self.name)?,
            phone: self.phone.map(|p| validation::phone("phone", p)).transpose()?,
            address: validation::optional_non_empty("address", self.address)?,
            pin: self.pin.map(|p| Pincode::for_field("pin", p)).transpose()?,
            city: validation::optional_non_empty("city", self.city)?,
            state: validation::optional_non_empty("state", self.state)?,
            country: validation::optional_non_empty("country", self.country)?,
            return_address: validation::optional_non_empty("return_address", self.return_address)?,
            return_pin: self
                .return_pin
                .map(|p| Pincode::for_field("return_pin", p))
                .transpose()?,
            return_city: validation::optional_non_empty("return_city", self.return_city)?,
            return_state: validation::optional_non_empty("return_state", self.return_state)?,
            return_country: validation::optional_non_empty("return_country", self.return_country)?,
            return_phone: self
                .return_phone
                .map(|p| validation::phone("return_phone", p))
                .transpose()?,
            products_desc: validation::optional_non_empty("products_desc", self.products_desc)?,
            order_items: self.order_items,
            payment_mode: self.payment_mode,
            shipping_mode: self.shipping_mode,
            total_amount: self.total_amount,
            cod_amount: self.cod_amount,
            weight_grams: self.weight_grams,
        };
        if update.sets_nothing() {
            return Err(ValidationError::NothingToUpdate { target: "order" });
        }
        Ok(update)
    }
}

fn check_not_negative(field: &'static str, amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// Acknowledgement of an order update or a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdateAck {
    pub status: bool,
    #[serde(default)]
    pub waybill: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default, deserialize_with = "messages")]
    pub error: Vec<String>,
}

/// Cancellation of a manifested shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelShipment {
    waybill: Waybill,
    cancellation: &'static str,
}

impl CancelShipment {
    pub fn new(waybill: Waybill) -> Self {
        Self {
            waybill,
            cancellation: "true",
        }
    }

    pub fn waybill(&self) -> &Waybill {
        &self.waybill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consignee() -> ConsigneeFields {
        ConsigneeFields {
            name: "Asha Rao".to_string(),
            address: "4 Residency Road".to_string(),
            pin: "560025".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            country: None,
            phone: "9876543210".to_string(),
        }
    }

    fn builder() -> ShipmentOrderBuilder {
        ShipmentOrder::builder(
            OrderReference::new("ORD-1001").unwrap(),
            consignee(),
            "BLR-Main",
        )
        .declared_value(Decimal::new(49900, 2))
    }

    fn cmu_data(order: &ShipmentOrder) -> serde_json::Value {
        let form = order.cmu_form().unwrap();
        assert_eq!(form[0], ("format".to_string(), "json".to_string()));
        serde_json::from_str(&form[1].1).unwrap()
    }

    #[test]
    fn prepaid_order_serializes_as_cmu_document() {
        let order = builder()
            .weight_grams(500)
            .dimensions(PackageDimensions {
                length_cm: Some(20),
                width_cm: Some(15),
                height_cm: Some(10),
            })
            .products_desc("Cotton kurta")
            .build()
            .unwrap();
        let data = cmu_data(&order);
        let shipment = &data["shipments"][0];
        assert_eq!(data["pickup_location"]["name"], "BLR-Main");
        assert_eq!(shipment["order"], "ORD-1001");
        assert_eq!(shipment["add"], "4 Residency Road");
        assert_eq!(shipment["pin"], "560025");
        assert_eq!(shipment["country"], "India");
        assert_eq!(shipment["payment_mode"], "Prepaid");
        assert_eq!(shipment["shipping_mode"], "Surface");
        assert_eq!(shipment["total_amount"], "499.00");
        assert_eq!(shipment["weight"], "500");
        assert_eq!(shipment["shipment_width"], "15");
        assert!(shipment.get("cod_amount").is_none());
        assert!(shipment.get("return_pin").is_none());
    }

    #[test]
    fn cod_requires_amount_within_declared_value() {
        let err = builder().payment_mode(PaymentMode::Cod).build().unwrap_err();
        assert_eq!(err.fields(), vec!["payment_mode", "cod_amount"]);

        let err = builder()
            .payment_mode(PaymentMode::Cod)
            .cod_amount(Decimal::new(50000, 2))
            .build()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["cod_amount", "total_amount"]);

        let order = builder()
            .payment_mode(PaymentMode::Cod)
            .cod_amount(Decimal::new(49900, 2))
            .build()
            .unwrap();
        assert_eq!(cmu_data(&order)["shipments"][0]["cod_amount"], "499.00");
        assert_eq!(cmu_data(&order)["shipments"][0]["payment_mode"], "COD");
    }

    #[test]
    fn prepaid_rejects_cod_amount() {
        let err = builder().cod_amount(Decimal::from(10)).build().unwrap_err();
        assert!(matches!(err, ValidationError::CrossField { .. }));
        assert!(builder().cod_amount(Decimal::ZERO).build().is_ok());
    }

    #[test]
    fn declared_value_is_required_and_non_negative() {
        let no_value = ShipmentOrder::builder(OrderReference::generate(), consignee(), "BLR-Main");
        assert_eq!(
            no_value.build().unwrap_err(),
            ValidationError::Missing { field: "total_amount" }
        );
        let err = builder().declared_value(Decimal::new(-1, 0)).build().unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "total_amount" });
        assert!(builder().declared_value(Decimal::ZERO).build().is_ok());
    }

    #[test]
    fn weight_needs_a_dimension() {
        let err = builder().weight_grams(800).build().unwrap_err();
        assert!(err.fields().contains(&"weight"));

        let err = builder()
            .dimensions(PackageDimensions {
                width_cm: Some(0),
                ..PackageDimensions::default()
            })
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "shipment_width" });
    }

    #[test]
    fn consignee_fields_use_wire_names() {
        let mut fields = consignee();
        fields.address = "  ".to_string();
        let err = ShipmentOrder::builder(OrderReference::generate(), fields, "BLR-Main")
            .declared_value(Decimal::ONE)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "add" });
    }

    #[test]
    fn return_address_is_validated_and_sent() {
        let order = builder()
            .return_address(ReturnAddressFields {
                address: "12 MG Road".to_string(),
                pin: "560001".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                country: None,
                phone: "9123456780".to_string(),
            })
            .build()
            .unwrap();
        assert_eq!(cmu_data(&order)["shipments"][0]["return_pin"], "560001");

        let err = builder()
            .return_address(ReturnAddressFields {
                pin: "1".to_string(),
                ..ReturnAddressFields::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "return_add" }));
    }

    #[test]
    fn identical_inputs_build_equal_orders() {
        assert_eq!(builder().build().unwrap(), builder().build().unwrap());
    }

    #[test]
    fn references_come_from_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(OrderReference::from(id).as_str(), id.to_string());
        assert_ne!(OrderReference::generate(), OrderReference::generate());
        assert!(OrderReference::new(" ").is_err());
    }

    #[test]
    fn created_response_helpers() {
        let created: OrderCreated = serde_json::from_str(
            r#"{"success":false,"upload_wbn":"UPL1","package_count":2,"cod_amount":0,
                "packages":[
                  {"status":"Success","waybill":"1234567890123","refnum":"A","remarks":[]},
                  {"status":"Fail","waybill":"","refnum":"B","remarks":["Duplicate order id"]}
                ]}"#,
        )
        .unwrap();
        assert_eq!(created.waybills(), vec!["1234567890123"]);
        assert_eq!(created.failed_packages().len(), 1);
        assert_eq!(created.error_messages(), vec!["Duplicate order id"]);
        assert!(!created.is_complete());
    }

    fn reference() -> OrderReference {
        OrderReference::new("ORD-1001").unwrap()
    }

    #[test]
    fn update_sends_only_set_fields() {
        let update = OrderUpdate::builder(reference())
            .phone("9123456780")
            .total_amount(Decimal::new(1999, 1))
            .build()
            .unwrap();
        let json = serde_json::to_value(update.cmu_document()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"shipments": [
                {"order": "ORD-1001", "phone": "9123456780", "total_amount": "199.9"}
            ]})
        );
    }

    #[test]
    fn update_carries_return_address_and_items() {
        let update = OrderUpdate::builder(reference())
            .waybill(Waybill::new("1234567890123").unwrap())
            .return_address("7 Church Street")
            .return_pin("560001")
            .return_phone("+919123456780")
            .return_country("India")
            .order_items(vec![OrderItem::new("Kurta", "KU-01", 2, Decimal::new(24950, 2)).unwrap()])
            .build()
            .unwrap();
        let shipment = &serde_json::to_value(update.cmu_document()).unwrap()["shipments"][0];
        assert_eq!(shipment["waybill"], "1234567890123");
        assert_eq!(shipment["return_address"], "7 Church Street");
        assert_eq!(shipment["return_pin"], "560001");
        assert_eq!(shipment["return_phone"], "9123456780");
        assert_eq!(shipment["return_country"], "India");
        assert_eq!(shipment["order_items"][0]["sku"], "KU-01");
        assert_eq!(shipment["order_items"][0]["units"], 2);
        assert!(shipment.get("return_city").is_none());
    }

    #[test]
    fn update_validates_return_fields_and_items() {
        let err = OrderUpdate::builder(reference()).return_pin("5600").build().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPincode { field: "return_pin", .. }));

        let err = OrderUpdate::builder(reference()).order_items(Vec::new()).build().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "order_items" });

        let err = OrderItem::new("Kurta", "KU-01", 0, Decimal::ONE).unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "units" });
        let err = OrderItem::new("Kurta", "KU-01", 1, Decimal::from(-1)).unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "selling_price" });
    }

    #[test]
    fn update_must_change_something() {
        let err = OrderUpdate::builder(reference())
            .waybill(Waybill::new("1234567890123").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::NothingToUpdate { target: "order" });
    }

    #[test]
    fn negative_cod_amount_is_rejected_on_its_own() {
        let err = OrderUpdate::builder(reference())
            .cod_amount(Decimal::from(-50))
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: "cod_amount" });
        assert!(OrderUpdate::builder(reference()).cod_amount(Decimal::ZERO).build().is_ok());
    }

    #[test]
    fn switching_to_cod_needs_an_amount() {
        let err = OrderUpdate::builder(reference())
            .payment_mode(PaymentMode::Cod)
            .build()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["payment_mode", "cod_amount"]);
    }

    #[test]
    fn cancel_payload() {
        let cancel = CancelShipment::new(Waybill::new("1234567890123").unwrap());
        assert_eq!(
            serde_json::to_value(&cancel).unwrap(),
            serde_json::json!({"waybill": "1234567890123", "cancellation": "true"})
        );
    }
}
