//! Audit log service
//!
//! Append-only recording of sensitive-field disclosures plus the paginated
//! query surface used by the audit dashboard.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::access::level::Role;
use crate::error::{AccessError, AccessResult};
use crate::models::{AuditFilter, AuditLogEntry, Page, Profile};
use crate::store::SharedStore;

/// Largest page a single audit query may return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct AuditLog {
    store: SharedStore,
}

impl AuditLog {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Append one disclosure entry. Never silently drops; a store failure
    /// surfaces as an error to the caller.
    pub async fn record(
        &self,
        actor_user_id: Uuid,
        table_name: &str,
        record_id: Uuid,
        field_accessed: &str,
        access_reason: &str,
        origin: &str,
    ) -> AccessResult<()> {
        self.record_at(
            actor_user_id,
            table_name,
            record_id,
            field_accessed,
            access_reason,
            origin,
            Utc::now(),
        )
        .await
    }

    /// Append with an explicit timestamp, so every entry written for one
    /// request carries that request's instant.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_at(
        &self,
        actor_user_id: Uuid,
        table_name: &str,
        record_id: Uuid,
        field_accessed: &str,
        access_reason: &str,
        origin: &str,
        at: DateTime<Utc>,
    ) -> AccessResult<()> {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: actor_user_id,
            table_name: table_name.to_string(),
            record_id,
            field_accessed: field_accessed.to_string(),
            access_reason: access_reason.to_string(),
            origin: origin.to_string(),
            created_at: at,
        };
        self.store.append_audit(entry).await
    }

    /// Newest-first page of entries matching the filter. Restricted to
    /// supervisors and admins; read-only, no write side effects.
    pub async fn query(
        &self,
        actor: &Profile,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> AccessResult<Page<AuditLogEntry>> {
        if actor.role < Role::Supervisor {
            return Err(AccessError::permission_denied("query_audit_log"));
        }

        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let result = self.store.query_audit(filter, page, page_size).await?;

        debug!(
            by = %actor.user_id,
            total = result.total,
            page = page,
            "audit log queried"
        );
        Ok(result)
    }
}
