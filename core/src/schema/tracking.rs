//! Shipment tracking.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationError};
use super::waybill::{self, Waybill};

const MAX_WAYBILLS: usize = 50;

/// Shipments to look up, by waybill, by order reference, or both. At least
/// one of either is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingQuery {
    waybills: Vec<Waybill>,
    ref_ids: Vec<String>,
}

impl TrackingQuery {
    pub fn new(waybills: Vec<Waybill>) -> Result<Self, ValidationError> {
        if waybills.is_empty() || waybills.len() > MAX_WAYBILLS {
            return Err(ValidationError::Count {
                field: "waybill",
                min: 1,
                max: MAX_WAYBILLS,
                actual: waybills.len(),
            });
        }
        Ok(Self {
            waybills,
            ref_ids: Vec::new(),
        })
    }

    /// Track by order references alone.
    pub fn by_ref_ids<I, S>(ref_ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = Self {
            waybills: Vec::new(),
            ref_ids: Vec::new(),
        }
        .with_ref_ids(ref_ids)?;
        if query.ref_ids.is_empty() {
            return Err(ValidationError::Count {
                field: "ref_ids",
                min: 1,
                max: MAX_WAYBILLS,
                actual: 0,
            });
        }
        Ok(query)
    }

    /// Also match shipments by the caller's order references.
    pub fn with_ref_ids<I, S>(mut self, ref_ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ref_ids {
            let id = validation::non_empty("ref_ids", id)?;
            if id.contains(',') {
                return Err(ValidationError::InvalidFormat {
                    field: "ref_ids",
                    expected: "a reference without commas",
                    value: id,
                });
            }
            self.ref_ids.push(id);
        }
        if self.ref_ids.len() > MAX_WAYBILLS {
            return Err(ValidationError::Count {
                field: "ref_ids",
                min: 0,
                max: MAX_WAYBILLS,
                actual: self.ref_ids.len(),
            });
        }
        Ok(self)
    }

    pub fn waybills(&self) -> &[Waybill] {
        &self.waybills
    }

    pub fn ref_ids(&self) -> &[String] {
        &self.ref_ids
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.waybills.is_empty() {
            pairs.push(("waybill".to_string(), waybill::join(&self.waybills)));
        }
        if !self.ref_ids.is_empty() {
            pairs.push(("ref_ids".to_string(), self.ref_ids.join(",")));
        }
        pairs
    }
}

/// Latest status of a shipment. Statuses this crate does not know keep the
/// provider's text in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TrackingStatus {
    Manifested,
    NotPicked,
    PickedUp,
    InTransit,
    Pending,
    Dispatched,
    Delivered,
    Rto,
    Dto,
    Returned,
    Lost,
    Cancelled,
    Other(String),
}

impl TrackingStatus {
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "manifested" => TrackingStatus::Manifested,
            "notpicked" => TrackingStatus::NotPicked,
            "pickedup" => TrackingStatus::PickedUp,
            "intransit" => TrackingStatus::InTransit,
            "pending" => TrackingStatus::Pending,
            "dispatched" | "outfordelivery" => TrackingStatus::Dispatched,
            "delivered" => TrackingStatus::Delivered,
            "rto" => TrackingStatus::Rto,
            "dto" => TrackingStatus::Dto,
            "returned" => TrackingStatus::Returned,
            "lost" => TrackingStatus::Lost,
            "cancelled" | "canceled" => TrackingStatus::Cancelled,
            _ => TrackingStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackingStatus::Delivered
                | TrackingStatus::Returned
                | TrackingStatus::Dto
                | TrackingStatus::Lost
                | TrackingStatus::Cancelled
        )
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TrackingStatus::Manifested => "Manifested",
            TrackingStatus::NotPicked => "Not Picked",
            TrackingStatus::PickedUp => "Picked Up",
            TrackingStatus::InTransit => "In Transit",
            TrackingStatus::Pending => "Pending",
            TrackingStatus::Dispatched => "Dispatched",
            TrackingStatus::Delivered => "Delivered",
            TrackingStatus::Rto => "RTO",
            TrackingStatus::Dto => "DTO",
            TrackingStatus::Returned => "Returned",
            TrackingStatus::Lost => "Lost",
            TrackingStatus::Cancelled => "Cancelled",
            TrackingStatus::Other(raw) => raw,
        };
        f.write_str(text)
    }
}

/// One scan in a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEvent {
    pub time: Option<NaiveDateTime>,
    /// Short scan type code such as `UD`, `PU` or `RT`.
    pub scan_type: Option<String>,
    pub scan: Option<String>,
    pub location: Option<String>,
    pub status_code: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentTrack {
    pub waybill: String,
    pub reference: Option<String>,
    pub status: TrackingStatus,
    pub status_location: Option<String>,
    pub status_time: Option<NaiveDateTime>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub expected_delivery: Option<NaiveDateTime>,
    pub is_rto: bool,
    /// Oldest first. Scans without a timestamp follow the timed ones.
    pub scans: Vec<ScanEvent>,
}

impl ShipmentTrack {
    pub fn is_delivered(&self) -> bool {
        self.status == TrackingStatus::Delivered
    }

    pub fn latest_scan(&self) -> Option<&ScanEvent> {
        self.scans.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TrackingWire")]
pub struct TrackingResult {
    pub shipments: Vec<ShipmentTrack>,
}

impl TrackingResult {
    pub fn find(&self, waybill: &str) -> Option<&ShipmentTrack> {
        self.shipments.iter().find(|s| s.waybill == waybill)
    }

    pub fn first(&self) -> Option<&ShipmentTrack> {
        self.shipments.first()
    }
}

impl TryFrom<TrackingWire> for TrackingResult {
    type Error = String;

    fn try_from(wire: TrackingWire) -> Result<Self, Self::Error> {
        let shipments = wire
            .shipment_data
            .into_iter()
            .filter_map(|entry| entry.shipment)
            .map(ShipmentTrack::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shipments })
    }
}

impl TryFrom<ShipmentWire> for ShipmentTrack {
    type Error = String;

    fn try_from(wire: ShipmentWire) -> Result<Self, Self::Error> {
        let waybill = wire
            .awb
            .map(|awb| awb.trim().to_string())
            .filter(|awb| !awb.is_empty())
            .ok_or_else(|| "shipment without AWB".to_string())?;

        let status = wire.status.unwrap_or_default();
        let mut scans = wire
            .scans
            .into_iter()
            .filter_map(|scan| scan.detail)
            .map(|detail| -> Result<ScanEvent, String> {
                Ok(ScanEvent {
                    time: timestamp("ScanDateTime", detail.scan_date_time.as_deref())?,
                    scan_type: detail.scan_type,
                    scan: detail.scan,
                    location: detail.scanned_location,
                    status_code: detail.status_code,
                    instructions: detail.instructions,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Stable: untimed scans go last, in the order the provider sent them.
        scans.sort_by_key(|scan| (scan.time.is_none(), scan.time));

        Ok(Self {
            waybill,
            reference: wire.reference_no.filter(|r| !r.is_empty()),
            status: status
                .status
                .as_deref()
                .map(TrackingStatus::parse)
                .unwrap_or(TrackingStatus::Other(String::new())),
            status_location: status.status_location,
            status_time: timestamp("StatusDateTime", status.status_date_time.as_deref())?,
            origin: wire.origin,
            destination: wire.destination,
            expected_delivery: timestamp(
                "ExpectedDeliveryDate",
                wire.expected_delivery_date.as_deref(),
            )?,
            is_rto: wire.rto_started_date.is_some_and(|d| !d.is_empty()),
            scans,
        })
    }
}

/// Provider timestamps are local ISO-8601, sometimes with fractional
/// seconds or an offset. Blank means absent.
fn timestamp(field: &str, raw: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
        .map(Some)
        .map_err(|_| format!("{field} is not a timestamp: {raw:?}"))
}

#[derive(Debug, Deserialize)]
struct TrackingWire {
    #[serde(rename = "ShipmentData", default)]
    shipment_data: Vec<ShipmentEntryWire>,
}

#[derive(Debug, Deserialize)]
struct ShipmentEntryWire {
    #[serde(rename = "Shipment")]
    shipment: Option<ShipmentWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipmentWire {
    #[serde(rename = "AWB")]
    awb: Option<String>,
    reference_no: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    expected_delivery_date: Option<String>,
    #[serde(rename = "RTOStartedDate")]
    rto_started_date: Option<String>,
    status: Option<StatusWire>,
    #[serde(default)]
    scans: Vec<ScanWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatusWire {
    status: Option<String>,
    status_location: Option<String>,
    status_date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScanWire {
    #[serde(rename = "ScanDetail")]
    detail: Option<ScanDetailWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScanDetailWire {
    scan_date_time: Option<String>,
    scan_type: Option<String>,
    scan: Option<String>,
    scanned_location: Option<String>,
    status_code: Option<String>,
    instructions: Option<String>,
}
