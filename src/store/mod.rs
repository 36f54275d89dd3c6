//! Storage abstraction for the access-control core
//!
//! Every service takes its store explicitly instead of reaching for a
//! process-wide client handle, so the core is testable against a
//! substitutable in-memory implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::access::level::Role;
use crate::access::session::SensitiveAccessSession;
use crate::error::AccessResult;
use crate::models::{
    AuditFilter, AuditLogEntry, BasicDriverInfo, DriverRecord, Page, Profile,
};

pub mod memory;

pub use memory::MemoryStore;

/// Shared handle to a backing store
pub type SharedStore = Arc<dyn AccessStore>;

/// Backing store operations required by the access-control core.
///
/// Implementations: [`MemoryStore`] (tests, embedding) and `PgStore`
/// (feature `database`).
#[async_trait]
pub trait AccessStore: Send + Sync {
    // ------------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------------

    async fn find_profile_by_user(&self, user_id: Uuid) -> AccessResult<Option<Profile>>;

    async fn find_profile(&self, profile_id: Uuid) -> AccessResult<Option<Profile>>;

    /// Insert the given profile unless one already exists for its user id.
    /// Returns the stored profile either way; two rapid calls for a brand-new
    /// identity must yield the same single profile.
    async fn insert_profile_if_absent(&self, profile: Profile) -> AccessResult<Profile>;

    async fn update_profile_role(
        &self,
        profile_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> AccessResult<Option<Profile>>;

    /// Returns false when no such profile existed.
    async fn delete_profile(&self, profile_id: Uuid) -> AccessResult<bool>;

    async fn list_profiles(&self) -> AccessResult<Vec<Profile>>;

    // ------------------------------------------------------------------------
    // Sensitive-access sessions
    // ------------------------------------------------------------------------

    /// Sessions are written exactly once at creation and never updated,
    /// except for the one-shot revocation timestamp.
    async fn insert_session(&self, session: SensitiveAccessSession) -> AccessResult<()>;

    async fn find_session(&self, token: Uuid) -> AccessResult<Option<SensitiveAccessSession>>;

    /// Set `revoked_at` if it is still unset. Returns the session as stored
    /// afterwards, or `None` for an unknown token.
    async fn revoke_session(
        &self,
        token: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> AccessResult<Option<SensitiveAccessSession>>;

    // ------------------------------------------------------------------------
    // Audit log
    // ------------------------------------------------------------------------

    /// Append-only; must never silently drop an entry.
    async fn append_audit(&self, entry: AuditLogEntry) -> AccessResult<()>;

    /// Newest-first page of matching entries plus the total match count.
    async fn query_audit(
        &self,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> AccessResult<Page<AuditLogEntry>>;

    async fn list_audit_entries(&self) -> AccessResult<Vec<AuditLogEntry>>;

    /// Delete entries strictly older than the cutoff; returns how many.
    async fn purge_audit_before(&self, cutoff: DateTime<Utc>) -> AccessResult<u64>;

    // ------------------------------------------------------------------------
    // Drivers (the protected resource)
    // ------------------------------------------------------------------------

    async fn find_driver(&self, driver_id: Uuid) -> AccessResult<Option<DriverRecord>>;

    /// Non-sensitive listing. Implementations must select only the
    /// non-sensitive columns; the full record never leaves the store here.
    async fn list_drivers_basic(&self) -> AccessResult<Vec<BasicDriverInfo>>;

    async fn list_drivers(&self) -> AccessResult<Vec<DriverRecord>>;

    /// Insert or update by id. Returns true when a new record was inserted.
    async fn upsert_driver(&self, driver: DriverRecord) -> AccessResult<bool>;
}
