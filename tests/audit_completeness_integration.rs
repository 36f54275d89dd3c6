//! Integration: audit completeness and fail-closed disclosure
//!
//! Every disclosing read must leave a trail; a disclosure whose audit
//! write fails must not be observable at all.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use vistoria::{
    AccessError, AccessLevel, AccessResult, AccessStore, AuditFilter, AuditLogEntry,
    BasicDriverInfo, DriverRecord, MaskingPolicy, MemoryStore, Page, Profile, Role, RoleRegistry,
    SensitiveAccessSession, SessionManager,
};

fn profile_with_role(role: Role) -> Profile {
    let mut profile = Profile::provision(Uuid::new_v4(), "user@example.com", Utc::now());
    profile.role = role;
    profile
}

fn sample_driver() -> DriverRecord {
    let now = Utc::now();
    DriverRecord {
        id: Uuid::new_v4(),
        full_name: "Paulo Lima".to_string(),
        national_id: "111.222.333-44".to_string(),
        license_number: "55566677788".to_string(),
        license_expiry: None,
        phone: Some("+55 31 90000-0000".to_string()),
        email: None,
        address: None,
        avatar_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Failing store wrapper: audit writes always fail
// ============================================================================

struct FailingAuditStore {
    inner: MemoryStore,
}

#[async_trait]
impl AccessStore for FailingAuditStore {
    async fn find_profile_by_user(&self, user_id: Uuid) -> AccessResult<Option<Profile>> {
        self.inner.find_profile_by_user(user_id).await
    }

    async fn find_profile(&self, profile_id: Uuid) -> AccessResult<Option<Profile>> {
        self.inner.find_profile(profile_id).await
    }

    async fn insert_profile_if_absent(&self, profile: Profile) -> AccessResult<Profile> {
        self.inner.insert_profile_if_absent(profile).await
    }

    async fn update_profile_role(
        &self,
        profile_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> AccessResult<Option<Profile>> {
        self.inner.update_profile_role(profile_id, role, now).await
    }

    async fn delete_profile(&self, profile_id: Uuid) -> AccessResult<bool> {
        self.inner.delete_profile(profile_id).await
    }

    async fn list_profiles(&self) -> AccessResult<Vec<Profile>> {
        self.inner.list_profiles().await
    }

    async fn insert_session(&self, session: SensitiveAccessSession) -> AccessResult<()> {
        self.inner.insert_session(session).await
    }

    async fn find_session(&self, token: Uuid) -> AccessResult<Option<SensitiveAccessSession>> {
        self.inner.find_session(token).await
    }

    async fn revoke_session(
        &self,
        token: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> AccessResult<Option<SensitiveAccessSession>> {
        self.inner.revoke_session(token, revoked_at).await
    }

    async fn append_audit(&self, _entry: AuditLogEntry) -> AccessResult<()> {
        Err(AccessError::backing_store("simulated audit store outage"))
    }

    async fn query_audit(
        &self,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> AccessResult<Page<AuditLogEntry>> {
        self.inner.query_audit(filter, page, page_size).await
    }

    async fn list_audit_entries(&self) -> AccessResult<Vec<AuditLogEntry>> {
        self.inner.list_audit_entries().await
    }

    async fn purge_audit_before(&self, cutoff: DateTime<Utc>) -> AccessResult<u64> {
        self.inner.purge_audit_before(cutoff).await
    }

    async fn find_driver(&self, driver_id: Uuid) -> AccessResult<Option<DriverRecord>> {
        self.inner.find_driver(driver_id).await
    }

    async fn list_drivers_basic(&self) -> AccessResult<Vec<BasicDriverInfo>> {
        self.inner.list_drivers_basic().await
    }

    async fn list_drivers(&self) -> AccessResult<Vec<DriverRecord>> {
        self.inner.list_drivers().await
    }

    async fn upsert_driver(&self, driver: DriverRecord) -> AccessResult<bool> {
        self.inner.upsert_driver(driver).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_n_disclosing_reads_leave_n_entries() {
    let store = Arc::new(MemoryStore::new());
    let driver = sample_driver();
    store.upsert_driver(driver.clone()).await.unwrap();

    let masking = MaskingPolicy::new(store.clone());
    let sessions = SessionManager::new(store.clone());
    let inspector = profile_with_role(Role::Inspector);

    let window_start = Utc::now();
    let grant = sessions
        .create_session(inspector.user_id, AccessLevel::Sensitive, "spot checks")
        .await
        .unwrap();

    let n = 5;
    for _ in 0..n {
        masking
            .resolve_driver_view(&inspector, Some(grant.token), driver.id, "unknown")
            .await
            .unwrap();
    }

    // At least N entries attributable to this actor in the window
    // (sensitive-level reads disclose exactly one class each, so exactly N)
    let filter = AuditFilter {
        user_id: Some(inspector.user_id),
        from: Some(window_start),
        ..Default::default()
    };
    let page = store.query_audit(&filter, 1, 100).await.unwrap();
    assert_eq!(page.total, n as u64);
    assert!(page
        .items
        .iter()
        .all(|e| e.record_id == driver.id && e.field_accessed == "license_number"));
}

#[tokio::test]
async fn test_audit_failure_aborts_disclosure() {
    let store = Arc::new(FailingAuditStore {
        inner: MemoryStore::new(),
    });
    let driver = sample_driver();
    store.inner.upsert_driver(driver.clone()).await.unwrap();

    let masking = MaskingPolicy::new(store.clone());
    let admin = profile_with_role(Role::Admin);

    let err = masking
        .resolve_driver_view(&admin, None, driver.id, "unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::AuditWriteFailed { .. }));
}

#[tokio::test]
async fn test_non_disclosing_read_survives_audit_outage() {
    // A basic-level read discloses nothing, so the broken audit store
    // never comes into play.
    let store = Arc::new(FailingAuditStore {
        inner: MemoryStore::new(),
    });
    let driver = sample_driver();
    store.inner.upsert_driver(driver.clone()).await.unwrap();

    let masking = MaskingPolicy::new(store.clone());
    let operator = profile_with_role(Role::Operator);

    let view = masking
        .resolve_driver_view(&operator, None, driver.id, "unknown")
        .await
        .unwrap();
    assert_eq!(view.effective_level, AccessLevel::Basic);
}

#[tokio::test]
async fn test_profile_creation_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let registry = RoleRegistry::new(store.clone());
    let user_id = Uuid::new_v4();

    let first = registry
        .get_or_create_profile(user_id, "novo@example.com")
        .await
        .unwrap();
    let second = registry
        .get_or_create_profile(user_id, "novo@example.com")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.role, Role::Operator);
    assert_eq!(store.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_sign_in_creates_one_profile() {
    let store = Arc::new(MemoryStore::new());
    let registry = RoleRegistry::new(store.clone());
    let user_id = Uuid::new_v4();

    let a = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.get_or_create_profile(user_id, "a@b.com").await })
    };
    let b = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.get_or_create_profile(user_id, "a@b.com").await })
    };

    let first = a.await.unwrap().unwrap();
    let second = b.await.unwrap().unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.list_profiles().await.unwrap().len(), 1);
}
