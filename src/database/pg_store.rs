//! PostgreSQL implementation of the storage abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::level::Role;
use crate::access::session::SensitiveAccessSession;
use crate::database::audit_repository::AuditRepository;
use crate::database::driver_repository::DriverRepository;
use crate::database::profile_repository::ProfileRepository;
use crate::database::session_repository::SessionRepository;
use crate::error::AccessResult;
use crate::models::{
    AuditFilter, AuditLogEntry, BasicDriverInfo, DriverRecord, Page, Profile,
};
use crate::store::AccessStore;

/// PostgreSQL-backed [`AccessStore`]
pub struct PgStore {
    profiles: ProfileRepository,
    sessions: SessionRepository,
    audit: AuditRepository,
    drivers: DriverRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            audit: AuditRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }
}

#[async_trait]
impl AccessStore for PgStore {
    async fn find_profile_by_user(&self, user_id: Uuid) -> AccessResult<Option<Profile>> {
        Ok(self.profiles.find_by_user(user_id).await?)
    }

    async fn find_profile(&self, profile_id: Uuid) -> AccessResult<Option<Profile>> {
        Ok(self.profiles.find(profile_id).await?)
    }

    async fn insert_profile_if_absent(&self, profile: Profile) -> AccessResult<Profile> {
        Ok(self.profiles.insert_if_absent(&profile).await?)
    }

    async fn update_profile_role(
        &self,
        profile_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> AccessResult<Option<Profile>> {
        Ok(self.profiles.update_role(profile_id, role, now).await?)
    }

    async fn delete_profile(&self, profile_id: Uuid) -> AccessResult<bool> {
        Ok(self.profiles.delete(profile_id).await?)
    }

    async fn list_profiles(&self) -> AccessResult<Vec<Profile>> {
        Ok(self.profiles.list().await?)
    }

    async fn insert_session(&self, session: SensitiveAccessSession) -> AccessResult<()> {
        Ok(self.sessions.insert(&session).await?)
    }

    async fn find_session(&self, token: Uuid) -> AccessResult<Option<SensitiveAccessSession>> {
        Ok(self.sessions.find(token).await?)
    }

    async fn revoke_session(
        &self,
        token: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> AccessResult<Option<SensitiveAccessSession>> {
        Ok(self.sessions.revoke(token, revoked_at).await?)
    }

    async fn append_audit(&self, entry: AuditLogEntry) -> AccessResult<()> {
        Ok(self.audit.append(&entry).await?)
    }

    async fn query_audit(
        &self,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> AccessResult<Page<AuditLogEntry>> {
        Ok(self.audit.query(filter, page, page_size).await?)
    }

    async fn list_audit_entries(&self) -> AccessResult<Vec<AuditLogEntry>> {
        Ok(self.audit.list_all().await?)
    }

    async fn purge_audit_before(&self, cutoff: DateTime<Utc>) -> AccessResult<u64> {
        Ok(self.audit.purge_before(cutoff).await?)
    }

    async fn find_driver(&self, driver_id: Uuid) -> AccessResult<Option<DriverRecord>> {
        Ok(self.drivers.find(driver_id).await?)
    }

    async fn list_drivers_basic(&self) -> AccessResult<Vec<BasicDriverInfo>> {
        Ok(self.drivers.list_basic().await?)
    }

    async fn list_drivers(&self) -> AccessResult<Vec<DriverRecord>> {
        Ok(self.drivers.list().await?)
    }

    async fn upsert_driver(&self, driver: DriverRecord) -> AccessResult<bool> {
        Ok(self.drivers.upsert(&driver).await?)
    }
}
