//! In-memory backing store
//!
//! Used by the test suites and available to embedders that do not need
//! persistence. All maps sit behind a single `RwLock` per collection;
//! profile provisioning holds the write lock across the lookup-and-insert
//! so concurrent first sign-ins cannot create two profiles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::access::level::Role;
use crate::access::session::SensitiveAccessSession;
use crate::error::AccessResult;
use crate::models::{
    AuditFilter, AuditLogEntry, BasicDriverInfo, DriverRecord, Page, Profile,
};
use crate::store::AccessStore;

/// In-memory implementation of [`AccessStore`]
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    sessions: RwLock<HashMap<Uuid, SensitiveAccessSession>>,
    audit: RwLock<Vec<AuditLogEntry>>,
    drivers: RwLock<HashMap<Uuid, DriverRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn find_profile_by_user(&self, user_id: Uuid) -> AccessResult<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_profile(&self, profile_id: Uuid) -> AccessResult<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&profile_id).cloned())
    }

    async fn insert_profile_if_absent(&self, profile: Profile) -> AccessResult<Profile> {
        let mut profiles = self.profiles.write().await;
        if let Some(existing) = profiles.values().find(|p| p.user_id == profile.user_id) {
            return Ok(existing.clone());
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile_role(
        &self,
        profile_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> AccessResult<Option<Profile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(&profile_id).map(|profile| {
            profile.role = role;
            profile.updated_at = now;
            profile.clone()
        }))
    }

    async fn delete_profile(&self, profile_id: Uuid) -> AccessResult<bool> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.remove(&profile_id).is_some())
    }

    async fn list_profiles(&self) -> AccessResult<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        let mut all: Vec<_> = profiles.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        Ok(all)
    }

    async fn insert_session(&self, session: SensitiveAccessSession) -> AccessResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token, session);
        Ok(())
    }

    async fn find_session(&self, token: Uuid) -> AccessResult<Option<SensitiveAccessSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&token).cloned())
    }

    async fn revoke_session(
        &self,
        token: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> AccessResult<Option<SensitiveAccessSession>> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.get_mut(&token).map(|session| {
            if session.revoked_at.is_none() {
                session.revoked_at = Some(revoked_at);
            }
            session.clone()
        }))
    }

    async fn append_audit(&self, entry: AuditLogEntry) -> AccessResult<()> {
        let mut audit = self.audit.write().await;
        audit.push(entry);
        Ok(())
    }

    async fn query_audit(
        &self,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> AccessResult<Page<AuditLogEntry>> {
        let audit = self.audit.read().await;
        let mut matching: Vec<_> = audit.iter().filter(|e| filter.matches(e)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * page_size as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    async fn list_audit_entries(&self) -> AccessResult<Vec<AuditLogEntry>> {
        let audit = self.audit.read().await;
        Ok(audit.clone())
    }

    async fn purge_audit_before(&self, cutoff: DateTime<Utc>) -> AccessResult<u64> {
        let mut audit = self.audit.write().await;
        let before = audit.len();
        audit.retain(|e| e.created_at >= cutoff);
        Ok((before - audit.len()) as u64)
    }

    async fn find_driver(&self, driver_id: Uuid) -> AccessResult<Option<DriverRecord>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.get(&driver_id).cloned())
    }

    async fn list_drivers_basic(&self) -> AccessResult<Vec<BasicDriverInfo>> {
        let drivers = self.drivers.read().await;
        let mut listing: Vec<BasicDriverInfo> = drivers.values().map(BasicDriverInfo::from).collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    async fn list_drivers(&self) -> AccessResult<Vec<DriverRecord>> {
        let drivers = self.drivers.read().await;
        let mut all: Vec<_> = drivers.values().cloned().collect();
        all.sort_by_key(|d| d.created_at);
        Ok(all)
    }

    async fn upsert_driver(&self, driver: DriverRecord) -> AccessResult<bool> {
        let mut drivers = self.drivers.write().await;
        Ok(drivers.insert(driver.id, driver).is_none())
    }
}
