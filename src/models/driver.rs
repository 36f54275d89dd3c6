//! Driver records and their masked views
//!
//! The stored record always holds full values; masking is a view-time
//! transform applied by the masking policy before anything leaves the core.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::level::AccessLevel;

/// Full driver record as persisted. Never serialized to a caller directly;
/// consumers go through `MaskedDriverView` or `BasicDriverInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub id: Uuid,
    pub full_name: String,
    /// National identity number (CPF), formatted `ddd.ddd.ddd-dd`
    pub national_id: String,
    pub license_number: String,
    pub license_expiry: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Non-sensitive listing entry for unprivileged contexts.
///
/// Produced by a distinct query that never selects the sensitive columns,
/// so PII cannot transit to a caller who should not see it even transiently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDriverInfo {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

impl From<&DriverRecord> for BasicDriverInfo {
    fn from(record: &DriverRecord) -> Self {
        Self {
            id: record.id,
            name: record.full_name.clone(),
            avatar_url: record.avatar_url.clone(),
            is_active: record.is_active,
        }
    }
}

/// Driver record as surfaced to a caller after the masking policy ran.
///
/// String fields carry either the full value or a fixed redaction; contact
/// fields are omitted entirely below the `full_pii` tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedDriverView {
    pub id: Uuid,
    pub full_name: String,
    pub national_id: String,
    pub license_number: String,
    pub license_expiry: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    /// Disclosure tier this view was resolved at
    pub effective_level: AccessLevel,
}
