//! Shipping cost quote request and its charge breakdown.
//!
//! The quote endpoint is the provider's only XML-returning endpoint. The
//! decoded shape lives here; the XML reading is in `crate::xml`.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pincode::Pincode;
use super::validation::ValidationError;

/// Billing mode, sent as `md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    #[serde(rename = "E")]
    Express,
    #[serde(rename = "S")]
    Surface,
}

impl DeliveryMode {
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryMode::Express => "E",
            DeliveryMode::Surface => "S",
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" | "Express" => Ok(DeliveryMode::Express),
            "S" | "Surface" => Ok(DeliveryMode::Surface),
            other => Err(ValidationError::NotAllowed {
                field: "md",
                allowed: "E, S",
                value: other.to_string(),
            }),
        }
    }
}

/// Shipment status the quote is priced for, sent as `ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Delivered,
    #[serde(rename = "RTO")]
    Rto,
    #[serde(rename = "DTO")]
    Dto,
}

impl ShipmentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Rto => "RTO",
            ShipmentStatus::Dto => "DTO",
        }
    }
}

impl FromStr for ShipmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Delivered" => Ok(ShipmentStatus::Delivered),
            "RTO" => Ok(ShipmentStatus::Rto),
            "DTO" => Ok(ShipmentStatus::Dto),
            other => Err(ValidationError::NotAllowed {
                field: "ss",
                allowed: "Delivered, RTO, DTO",
                value: other.to_string(),
            }),
        }
    }
}

/// Payment type the quote is priced for, sent as `pt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "Pre-paid")]
    Prepaid,
    #[serde(rename = "COD")]
    Cod,
    Pickup,
}

impl PaymentType {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentType::Prepaid => "Pre-paid",
            PaymentType::Cod => "COD",
            PaymentType::Pickup => "Pickup",
        }
    }
}

impl FromStr for PaymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pre-paid" => Ok(PaymentType::Prepaid),
            "COD" => Ok(PaymentType::Cod),
            "Pickup" => Ok(PaymentType::Pickup),
            other => Err(ValidationError::NotAllowed {
                field: "pt",
                allowed: "Pre-paid, COD, Pickup",
                value: other.to_string(),
            }),
        }
    }
}

/// Cost quote for one parcel between two pincodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingCostQuery {
    mode: DeliveryMode,
    chargeable_weight_grams: u32,
    origin: Pincode,
    destination: Pincode,
    status: ShipmentStatus,
    payment: PaymentType,
}

impl ShippingCostQuery {
    pub fn new(
        mode: DeliveryMode,
        chargeable_weight_grams: u32,
        origin: &str,
        destination: &str,
        status: ShipmentStatus,
        payment: PaymentType,
    ) -> Result<Self, ValidationError> {
        if chargeable_weight_grams == 0 {
            return Err(ValidationError::NotPositive { field: "cgm" });
        }
        Ok(Self {
            mode,
            chargeable_weight_grams,
            origin: Pincode::for_field("o_pin", origin)?,
            destination: Pincode::for_field("d_pin", destination)?,
            status,
            payment,
        })
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn chargeable_weight_grams(&self) -> u32 {
        self.chargeable_weight_grams
    }

    pub fn origin(&self) -> &Pincode {
        &self.origin
    }

    pub fn destination(&self) -> &Pincode {
        &self.destination
    }

    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    pub fn payment(&self) -> PaymentType {
        self.payment
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("md".to_string(), self.mode.code().to_string()),
            ("cgm".to_string(), self.chargeable_weight_grams.to_string()),
            ("o_pin".to_string(), self.origin.to_string()),
            ("d_pin".to_string(), self.destination.to_string()),
            ("ss".to_string(), self.status.code().to_string()),
            ("pt".to_string(), self.payment.code().to_string()),
        ]
    }
}

/// Itemized cost of a shipment as quoted by the provider.
///
/// `charges` holds every `charge_*` component keyed by its code without the
/// prefix: `DL` is base freight, `FSC` the fuel surcharge, `COD` the
/// cash-on-delivery fee, and so on. Components the provider omitted are
/// absent, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub total_amount: Decimal,
    pub gross_amount: Option<Decimal>,
    /// Weight the quote was billed on, in grams.
    pub charged_weight: Option<Decimal>,
    pub zone: Option<String>,
    pub status: Option<String>,
    pub charges: BTreeMap<String, Decimal>,
    pub tax: TaxBreakdown,
}

impl ChargeBreakdown {
    pub fn charge(&self, code: &str) -> Option<Decimal> {
        self.charges.get(code).copied()
    }

    pub fn base_freight(&self) -> Option<Decimal> {
        self.charge("DL")
    }

    pub fn fuel_surcharge(&self) -> Option<Decimal> {
        self.charge("FSC")
    }

    pub fn cod_charge(&self) -> Option<Decimal> {
        self.charge("COD")
    }

    /// Sum of the itemized components, before tax.
    pub fn itemized_total(&self) -> Decimal {
        self.charges.values().copied().sum()
    }
}

/// GST and legacy cess components of a quote. Missing components are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub igst: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub service_tax: Decimal,
    pub swachh_bharat_tax: Decimal,
    pub krishi_kalyan_cess: Decimal,
}

impl TaxBreakdown {
    pub fn total(&self) -> Decimal {
        self.igst
            + self.cgst
            + self.sgst
            + self.service_tax
            + self.swachh_bharat_tax
            + self.krishi_kalyan_cess
    }
}
