//! Malfunction report domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Validated report content.
///
/// Surrounding whitespace is trimmed; the remainder must be 1 to 200
/// characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportText(String);

impl ReportText {
    pub const MAX_CHARS: usize = 200;

    pub fn parse(value: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("Report must not be empty".into()));
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "Report must be <= {} characters",
                Self::MAX_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReportText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ReportText> for String {
    fn from(text: ReportText) -> Self {
        text.0
    }
}

impl std::fmt::Display for ReportText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Moderation status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReportStatus {
    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Malfunction report entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalfunctionReport {
    pub id: Uuid,
    /// Station the complaint is about (reference, not ownership)
    pub station_id: i32,
    pub report_text: ReportText,
    pub status: ReportStatus,
    pub filed_at: DateTime<Utc>,
}

impl MalfunctionReport {
    pub fn new(station_id: i32, report_text: ReportText) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id,
            report_text,
            status: ReportStatus::Pending,
            filed_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }
}
