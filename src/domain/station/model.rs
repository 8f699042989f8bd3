//! Station domain entity

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Postal code of a station's district.
///
/// Exactly five ASCII digits, starting with `10`, `12` or `13`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    const PREFIXES: [&'static str; 3] = ["10", "12", "13"];

    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(
                "Postal code must be numeric".into(),
            ));
        }
        if value.len() != 5 {
            return Err(DomainError::Validation(
                "Postal code must have exactly 5 digits".into(),
            ));
        }
        if !Self::PREFIXES.iter().any(|p| value.starts_with(p)) {
            return Err(DomainError::Validation(
                "Postal code must start with 10, 12 or 13".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostalCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Availability as reported on status-change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "AVAILABLE"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

/// Derived per-station condition.
///
/// Not stored anywhere; computed from `available` and the approved-report
/// count of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationCondition {
    /// Available, no approved reports
    Operational,
    /// Available, some approved reports but below the threshold
    Degraded,
    /// Taken out of service until repair is completed
    Unavailable,
}

impl StationCondition {
    pub fn derive(available: bool, approved_count: u32) -> Self {
        match (available, approved_count) {
            (false, _) => Self::Unavailable,
            (true, 0) => Self::Operational,
            (true, _) => Self::Degraded,
        }
    }
}

impl std::fmt::Display for StationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operational => write!(f, "OPERATIONAL"),
            Self::Degraded => write!(f, "DEGRADED"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

/// Charging station entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Stable unique identifier
    pub station_id: i32,
    pub postal_code: PostalCode,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Whether the station is currently usable
    pub available: bool,
    /// Operating company
    pub operator: Option<String>,
    /// Street address
    pub address: Option<String>,
}

impl Station {
    pub fn new(station_id: i32, postal_code: PostalCode) -> Self {
        Self {
            station_id,
            postal_code,
            latitude: None,
            longitude: None,
            available: true,
            operator: None,
            address: None,
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
