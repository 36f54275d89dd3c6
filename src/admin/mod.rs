//! Administrative maintenance operations
//!
//! The thin backend functions that sit next to the access-control core:
//! data export/import and audit retention cleanup. All of them are
//! admin-only, and the export itself leaves an audit trail because the
//! bundle carries full driver PII.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::access::audit_log::AuditLog;
use crate::access::level::Role;
use crate::error::{AccessError, AccessResult};
use crate::models::{AuditLogEntry, DriverRecord, Profile};
use crate::store::SharedStore;

/// Table name recorded when an export is audited
const EXPORTS_TABLE: &str = "exports";

/// Full data export: drivers, profiles, and the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub id: Uuid,
    pub exported_at: DateTime<Utc>,
    pub drivers: Vec<DriverRecord>,
    pub profiles: Vec<Profile>,
    pub audit_entries: Vec<AuditLogEntry>,
}

/// Counts from a driver import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub updated: u64,
}

#[derive(Clone)]
pub struct AdminService {
    store: SharedStore,
    audit: AuditLog,
}

impl AdminService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            audit: AuditLog::new(store.clone()),
            store,
        }
    }

    fn require_admin(actor: &Profile, operation: &str) -> AccessResult<()> {
        if actor.role != Role::Admin {
            return Err(AccessError::permission_denied(operation));
        }
        Ok(())
    }

    /// Export all drivers, profiles, and audit entries.
    ///
    /// The bundle contains unmasked PII, so the export is itself audited
    /// before it is handed back; if that write fails the export fails
    /// closed like any other disclosure.
    pub async fn export_data(&self, actor: &Profile, origin: &str) -> AccessResult<ExportBundle> {
        Self::require_admin(actor, "export_data")?;

        let now = Utc::now();
        let bundle = ExportBundle {
            id: Uuid::new_v4(),
            exported_at: now,
            drivers: self.store.list_drivers().await?,
            profiles: self.store.list_profiles().await?,
            audit_entries: self.store.list_audit_entries().await?,
        };

        self.audit
            .record_at(
                actor.user_id,
                EXPORTS_TABLE,
                bundle.id,
                "export_bundle",
                "full data export",
                origin,
                now,
            )
            .await
            .map_err(|e| AccessError::AuditWriteFailed {
                message: e.to_string(),
            })?;

        info!(
            by = %actor.user_id,
            drivers = bundle.drivers.len(),
            "data export produced"
        );
        Ok(bundle)
    }

    /// Upsert drivers by id. Existing records are overwritten; audit
    /// entries referencing them are untouched.
    pub async fn import_drivers(
        &self,
        actor: &Profile,
        drivers: Vec<DriverRecord>,
    ) -> AccessResult<ImportSummary> {
        Self::require_admin(actor, "import_drivers")?;

        let mut summary = ImportSummary::default();
        for driver in drivers {
            if self.store.upsert_driver(driver).await? {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }

        info!(
            by = %actor.user_id,
            inserted = summary.inserted,
            updated = summary.updated,
            "driver import finished"
        );
        Ok(summary)
    }

    /// Retention cleanup: delete audit entries strictly older than the
    /// cutoff. Explicit and admin-only; normal operation never deletes.
    pub async fn purge_audit_older_than(
        &self,
        actor: &Profile,
        cutoff: DateTime<Utc>,
    ) -> AccessResult<u64> {
        Self::require_admin(actor, "purge_audit")?;

        let purged = self.store.purge_audit_before(cutoff).await?;
        info!(by = %actor.user_id, purged = purged, cutoff = %cutoff, "audit retention purge");
        Ok(purged)
    }
}
