use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Where an application stands. Closed set; the store rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusType {
    Saved,
    Applied,
    Screen,
    Interview,
    Assessment,
    Offer,
    Accepted,
    Rejected,
    Withdrawn,
    Ghosted,
}

impl StatusType {
    pub const ALL: [StatusType; 10] = [
        StatusType::Saved,
        StatusType::Applied,
        StatusType::Screen,
        StatusType::Interview,
        StatusType::Assessment,
        StatusType::Offer,
        StatusType::Accepted,
        StatusType::Rejected,
        StatusType::Withdrawn,
        StatusType::Ghosted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusType::Saved => "SAVED",
            StatusType::Applied => "APPLIED",
            StatusType::Screen => "SCREEN",
            StatusType::Interview => "INTERVIEW",
            StatusType::Assessment => "ASSESSMENT",
            StatusType::Offer => "OFFER",
            StatusType::Accepted => "ACCEPTED",
            StatusType::Rejected => "REJECTED",
            StatusType::Withdrawn => "WITHDRAWN",
            StatusType::Ghosted => "GHOSTED",
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusType::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StoreError::DomainConstraint(format!("unknown status '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub company_id: i64,
    pub full_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub url: Option<String>,
    pub salary: Option<Decimal>,
    pub posted_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub applied_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub priority: Option<u8>, // 1 (highest) ..= 5
    pub resume_ref: Option<String>,
}

/// One event in an application's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub id: i64,
    pub application_id: i64,
    pub contact_id: Option<i64>,
    pub status: StatusType,
    /// Position in the application's timeline, starting at 1.
    pub seq: i64,
    pub recorded_at: NaiveDateTime,
}

// --- Insert payloads ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    pub company_id: i64,
    pub full_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub company_id: i64,
    pub title: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub url: Option<String>,
    pub salary: Option<Decimal>,
    pub posted_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub job_id: i64,
    pub applied_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub priority: Option<u8>,
    pub resume_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplicationStatus {
    pub application_id: i64,
    pub contact_id: Option<i64>,
    pub status: StatusType,
    /// Defaults to the current time when absent.
    pub recorded_at: Option<NaiveDateTime>,
}

/// A status event joined with everything it hangs off. Read-only; assembled
/// by query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: ApplicationStatus,
    pub application: Application,
    pub job: JobPosting,
    pub company: Company,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub companies: i64,
    pub contacts: i64,
    pub job_postings: i64,
    pub applications: i64,
    pub statuses: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in StatusType::ALL {
            assert_eq!(status.as_str().parse::<StatusType>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        for bad in ["saved", "PENDING", "", "OFFER "] {
            let err = bad.parse::<StatusType>().unwrap_err();
            assert!(matches!(err, StoreError::DomainConstraint(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&StatusType::Ghosted).unwrap();
        assert_eq!(json, "\"GHOSTED\"");
        let back: StatusType = serde_json::from_str("\"ASSESSMENT\"").unwrap();
        assert_eq!(back, StatusType::Assessment);
    }
}
