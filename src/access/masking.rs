//! Field masking policy
//!
//! Given a caller's role and any active sensitive-access session, decides
//! which fields of a driver record are returned in full vs. redacted.
//! Masking is a view-time transform; the stored record always holds full
//! values.
//!
//! Every disclosure of a sensitive field class writes its audit entry
//! BEFORE the view is returned. If any audit write fails the whole read
//! fails with `AuditWriteFailed` so a disclosure can never be observed
//! without its trail existing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::access::audit_log::AuditLog;
use crate::access::level::{AccessLevel, Role};
use crate::access::session::SensitiveAccessSession;
use crate::error::{AccessError, AccessResult};
use crate::models::{DriverRecord, MaskedDriverView, Profile};
use crate::store::SharedStore;

/// Table name recorded for every driver-field disclosure
pub const DRIVERS_TABLE: &str = "drivers";

/// Fixed placeholder for a fully redacted national id (CPF shape)
pub const NATIONAL_ID_PLACEHOLDER: &str = "***.***.***-**";

/// Fixed placeholder for a fully redacted license number
pub const LICENSE_PLACEHOLDER: &str = "REDACTED";

/// Generic placeholder for redacted contact fields
pub const CONTACT_PLACEHOLDER: &str = "[redacted]";

/// Audit reason recorded when an admin reads without a session
const ADMIN_OVERRIDE_REASON: &str = "role: admin";

// ============================================================================
// Sensitive field classes
// ============================================================================

/// Classes of sensitive driver fields, audited one entry per class disclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveFieldClass {
    NationalId,
    LicenseNumber,
    ContactInfo,
}

impl SensitiveFieldClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveFieldClass::NationalId => "national_id",
            SensitiveFieldClass::LicenseNumber => "license_number",
            SensitiveFieldClass::ContactInfo => "contact_info",
        }
    }
}

impl fmt::Display for SensitiveFieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Pure masking decision
// ============================================================================

/// Replace every digit with `*`, keeping punctuation, so a formatted CPF
/// redacts to the canonical `***.***.***-**` shape.
pub fn redact_national_id(national_id: &str) -> String {
    national_id
        .chars()
        .map(|c| if c.is_ascii_digit() { '*' } else { c })
        .collect()
}

/// Resolve the effective disclosure tier for one request.
///
/// Evaluated against a single `now` so one response cannot mix masking
/// levels. An admin role wins regardless of session state; otherwise only
/// an active session owned by the actor elevates above `basic`.
pub fn effective_level(
    role: Role,
    session: Option<&SensitiveAccessSession>,
    now: DateTime<Utc>,
) -> (AccessLevel, bool) {
    if role.is_admin() {
        return (AccessLevel::FullPii, true);
    }
    match session {
        Some(s) if s.is_active(now) => (s.level, false),
        _ => (AccessLevel::Basic, false),
    }
}

/// Apply the decision table to a record. No side effects; returns the view
/// together with the field classes it discloses.
pub fn apply_masking(
    record: &DriverRecord,
    level: AccessLevel,
) -> (MaskedDriverView, Vec<SensitiveFieldClass>) {
    match level {
        AccessLevel::FullPii => {
            let mut disclosed = vec![
                SensitiveFieldClass::NationalId,
                SensitiveFieldClass::LicenseNumber,
            ];
            let has_contact =
                record.phone.is_some() || record.email.is_some() || record.address.is_some();
            if has_contact {
                disclosed.push(SensitiveFieldClass::ContactInfo);
            }
            let view = MaskedDriverView {
                id: record.id,
                full_name: record.full_name.clone(),
                national_id: record.national_id.clone(),
                license_number: record.license_number.clone(),
                license_expiry: record.license_expiry,
                phone: record.phone.clone(),
                email: record.email.clone(),
                address: record.address.clone(),
                avatar_url: record.avatar_url.clone(),
                is_active: record.is_active,
                effective_level: AccessLevel::FullPii,
            };
            (view, disclosed)
        }
        AccessLevel::Sensitive => {
            let view = MaskedDriverView {
                id: record.id,
                full_name: record.full_name.clone(),
                national_id: redact_national_id(&record.national_id),
                license_number: record.license_number.clone(),
                license_expiry: record.license_expiry,
                phone: record.phone.as_ref().map(|_| CONTACT_PLACEHOLDER.to_string()),
                email: record.email.as_ref().map(|_| CONTACT_PLACEHOLDER.to_string()),
                address: record
                    .address
                    .as_ref()
                    .map(|_| CONTACT_PLACEHOLDER.to_string()),
                avatar_url: record.avatar_url.clone(),
                is_active: record.is_active,
                effective_level: AccessLevel::Sensitive,
            };
            (view, vec![SensitiveFieldClass::LicenseNumber])
        }
        AccessLevel::Basic => {
            let view = MaskedDriverView {
                id: record.id,
                full_name: record.full_name.clone(),
                national_id: NATIONAL_ID_PLACEHOLDER.to_string(),
                license_number: LICENSE_PLACEHOLDER.to_string(),
                license_expiry: None,
                phone: None,
                email: None,
                address: None,
                avatar_url: record.avatar_url.clone(),
                is_active: record.is_active,
                effective_level: AccessLevel::Basic,
            };
            (view, Vec::new())
        }
    }
}

// ============================================================================
// Masking Policy service
// ============================================================================

/// Resolves masked driver views, auditing every disclosure before it is
/// returned to the caller.
#[derive(Clone)]
pub struct MaskingPolicy {
    store: SharedStore,
    audit: AuditLog,
}

impl MaskingPolicy {
    pub fn new(store: SharedStore) -> Self {
        Self {
            audit: AuditLog::new(store.clone()),
            store,
        }
    }

    /// Non-sensitive driver listing for unprivileged contexts. Backed by a
    /// distinct store query that never selects sensitive columns, so no
    /// disclosure happens and no audit entries are written.
    pub async fn list_drivers_basic(&self) -> AccessResult<Vec<crate::models::BasicDriverInfo>> {
        self.store.list_drivers_basic().await
    }

    /// Resolve the view a caller is allowed to see of one driver record.
    pub async fn resolve_driver_view(
        &self,
        actor: &Profile,
        session_token: Option<Uuid>,
        driver_id: Uuid,
        origin: &str,
    ) -> AccessResult<MaskedDriverView> {
        self.resolve_driver_view_at(actor, session_token, driver_id, origin, Utc::now())
            .await
    }

    /// Same as [`resolve_driver_view`](Self::resolve_driver_view) with an
    /// explicit timestamp. The whole request is evaluated against this one
    /// instant; expiry is never re-checked mid-response.
    pub async fn resolve_driver_view_at(
        &self,
        actor: &Profile,
        session_token: Option<Uuid>,
        driver_id: Uuid,
        origin: &str,
        now: DateTime<Utc>,
    ) -> AccessResult<MaskedDriverView> {
        let record = self
            .store
            .find_driver(driver_id)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("driver {}", driver_id)))?;

        let (level, reason) = self.request_context(actor, session_token, now).await?;
        let view = self.disclose_record(actor, &record, level, &reason, origin, now).await?;

        debug!(
            driver_id = %driver_id,
            user_id = %actor.user_id,
            level = %view.effective_level,
            "driver view resolved"
        );
        Ok(view)
    }

    /// Server-side masked listing of all drivers.
    pub async fn resolve_driver_listing(
        &self,
        actor: &Profile,
        session_token: Option<Uuid>,
        origin: &str,
    ) -> AccessResult<Vec<MaskedDriverView>> {
        self.resolve_driver_listing_at(actor, session_token, origin, Utc::now())
            .await
    }

    /// Masked listing against one request timestamp, so every record in the
    /// response is masked at the same tier.
    pub async fn resolve_driver_listing_at(
        &self,
        actor: &Profile,
        session_token: Option<Uuid>,
        origin: &str,
        now: DateTime<Utc>,
    ) -> AccessResult<Vec<MaskedDriverView>> {
        let records = self.store.list_drivers().await?;
        let (level, reason) = self.request_context(actor, session_token, now).await?;

        let mut views = Vec::with_capacity(records.len());
        for record in &records {
            views.push(
                self.disclose_record(actor, record, level, &reason, origin, now)
                    .await?,
            );
        }
        Ok(views)
    }

    /// Resolve the effective level and audit reason for one request.
    async fn request_context(
        &self,
        actor: &Profile,
        session_token: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AccessResult<(AccessLevel, String)> {
        // A token belonging to another identity never elevates this caller.
        let session = match session_token {
            Some(token) => self
                .store
                .find_session(token)
                .await?
                .filter(|s| s.user_id == actor.user_id),
            None => None,
        };

        let (level, admin_override) = effective_level(actor.role, session.as_ref(), now);
        let reason = match session.as_ref().filter(|s| s.is_active(now)) {
            Some(s) => s.justification.clone(),
            None if admin_override => ADMIN_OVERRIDE_REASON.to_string(),
            None => String::new(),
        };
        Ok((level, reason))
    }

    /// Apply masking to one record and audit its disclosures.
    ///
    /// Audit before disclose: the trail must exist before the caller can
    /// observe the data. Any write failure aborts the read.
    async fn disclose_record(
        &self,
        actor: &Profile,
        record: &DriverRecord,
        level: AccessLevel,
        reason: &str,
        origin: &str,
        now: DateTime<Utc>,
    ) -> AccessResult<MaskedDriverView> {
        let (view, disclosed) = apply_masking(record, level);

        for class in &disclosed {
            self.audit
                .record_at(
                    actor.user_id,
                    DRIVERS_TABLE,
                    record.id,
                    class.as_str(),
                    reason,
                    origin,
                    now,
                )
                .await
                .map_err(|e| {
                    warn!(
                        driver_id = %record.id,
                        user_id = %actor.user_id,
                        field = %class,
                        "audit write failed, aborting disclosure: {}",
                        e
                    );
                    AccessError::AuditWriteFailed {
                        message: e.to_string(),
                    }
                })?;
        }

        Ok(view)
    }
}
