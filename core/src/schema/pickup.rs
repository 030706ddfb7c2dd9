//! Pickup scheduling at a registered warehouse.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A pickup for today or a later day.
///
/// `pickup_location` must name a warehouse already registered with the
/// provider; the provider checks that, not this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupRequest {
    pickup_date: NaiveDate,
    pickup_time: NaiveTime,
    pickup_location: String,
    expected_package_count: u32,
}

impl PickupRequest {
    pub fn new(
        pickup_date: NaiveDate,
        pickup_time: NaiveTime,
        pickup_location: impl Into<String>,
        expected_package_count: u32,
    ) -> Result<Self, ValidationError> {
        Self::new_on(
            Local::now().date_naive(),
            pickup_date,
            pickup_time,
            pickup_location,
            expected_package_count,
        )
    }

    /// Like `new`, judging "the past" relative to `today`.
    pub fn new_on(
        today: NaiveDate,
        pickup_date: NaiveDate,
        pickup_time: NaiveTime,
        pickup_location: impl Into<String>,
        expected_package_count: u32,
    ) -> Result<Self, ValidationError> {
        let pickup_location = validation::non_empty("pickup_location", pickup_location)?;
        if expected_package_count == 0 {
            return Err(ValidationError::NotPositive {
                field: "expected_package_count",
            });
        }
        if pickup_date < today {
            return Err(ValidationError::InPast {
                field: "pickup_date",
                value: pickup_date.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self {
            pickup_date,
            pickup_time,
            pickup_location,
            expected_package_count,
        })
    }

    /// Build from the provider's text formats, `YYYY-MM-DD` and `HH:MM:SS`.
    pub fn parse(
        pickup_date: &str,
        pickup_time: &str,
        pickup_location: impl Into<String>,
        expected_package_count: u32,
    ) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(pickup_date, DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidFormat {
                field: "pickup_date",
                expected: "YYYY-MM-DD",
                value: pickup_date.to_string(),
            }
        })?;
        let time = NaiveTime::parse_from_str(pickup_time, TIME_FORMAT).map_err(|_| {
            ValidationError::InvalidFormat {
                field: "pickup_time",
                expected: "HH:MM:SS",
                value: pickup_time.to_string(),
            }
        })?;
        Self::new(date, time, pickup_location, expected_package_count)
    }

    pub fn pickup_date(&self) -> NaiveDate {
        self.pickup_date
    }

    pub fn pickup_time(&self) -> NaiveTime {
        self.pickup_time
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    pub fn expected_package_count(&self) -> u32 {
        self.expected_package_count
    }
}

impl Serialize for PickupRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            pickup_time: String,
            pickup_date: String,
            pickup_location: &'a str,
            expected_package_count: u32,
        }

        Wire {
            pickup_time: self.pickup_time.format(TIME_FORMAT).to_string(),
            pickup_date: self.pickup_date.format(DATE_FORMAT).to_string(),
            pickup_location: &self.pickup_location,
            expected_package_count: self.expected_package_count,
        }
        .serialize(serializer)
    }
}

/// Confirmed pickup. Any field the provider adds beyond these is treated as
/// a shape change and fails decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickupResult {
    pub pickup_id: u64,
    pub pickup_location_name: String,
    pub client_name: String,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub incoming_center_name: String,
    pub expected_package_count: u32,
}
