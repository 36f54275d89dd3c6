//! Integration: administrative operations
//!
//! Role changes, user deletion, data export/import, and audit retention
//! cleanup, all against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use vistoria::{
    AccessError, AccessStore, AdminService, AuditLogEntry, DriverRecord, ExportBundle,
    MemoryStore, Profile, Role, RoleRegistry,
};

fn profile_with_role(role: Role) -> Profile {
    let mut profile = Profile::provision(Uuid::new_v4(), "user@example.com", Utc::now());
    profile.role = role;
    profile
}

fn sample_driver(name: &str) -> DriverRecord {
    let now = Utc::now();
    DriverRecord {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        national_id: "222.333.444-55".to_string(),
        license_number: "10203040506".to_string(),
        license_expiry: None,
        phone: None,
        email: None,
        address: None,
        avatar_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Role registry mutations
// ============================================================================

#[tokio::test]
async fn test_update_role_is_admin_only() {
    let store = Arc::new(MemoryStore::new());
    let registry = RoleRegistry::new(store.clone());

    let target = registry
        .get_or_create_profile(Uuid::new_v4(), "target@example.com")
        .await
        .unwrap();

    for role in [Role::Operator, Role::Inspector, Role::Supervisor] {
        let err = registry
            .update_role(&profile_with_role(role), target.id, Role::Inspector)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::PermissionDenied { .. }));
    }

    let updated = registry
        .update_role(&profile_with_role(Role::Admin), target.id, Role::Inspector)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Inspector);
}

#[tokio::test]
async fn test_update_role_never_self_service() {
    let store = Arc::new(MemoryStore::new());
    let registry = RoleRegistry::new(store.clone());

    let admin = registry
        .get_or_create_profile(Uuid::new_v4(), "admin@example.com")
        .await
        .unwrap();
    // Promote via the store directly so the actor IS an admin profile
    let admin = store
        .update_profile_role(admin.id, Role::Admin, Utc::now())
        .await
        .unwrap()
        .unwrap();

    let err = registry
        .update_role(&admin, admin.id, Role::Operator)
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied { .. }));
}

#[tokio::test]
async fn test_update_role_unknown_target() {
    let registry = RoleRegistry::new(Arc::new(MemoryStore::new()));
    let err = registry
        .update_role(&profile_with_role(Role::Admin), Uuid::new_v4(), Role::Admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_user() {
    let store = Arc::new(MemoryStore::new());
    let registry = RoleRegistry::new(store.clone());
    let admin = profile_with_role(Role::Admin);

    let target = registry
        .get_or_create_profile(Uuid::new_v4(), "bye@example.com")
        .await
        .unwrap();

    let err = registry
        .delete_user(&profile_with_role(Role::Supervisor), target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied { .. }));

    registry.delete_user(&admin, target.id).await.unwrap();
    assert!(store.find_profile(target.id).await.unwrap().is_none());

    let err = registry.delete_user(&admin, target.id).await.unwrap_err();
    assert!(matches!(err, AccessError::NotFound { .. }));
}

// ============================================================================
// Export / import
// ============================================================================

#[tokio::test]
async fn test_export_is_admin_only_and_audited() {
    let store = Arc::new(MemoryStore::new());
    let admin_service = AdminService::new(store.clone());

    store
        .upsert_driver(sample_driver("Ana Costa"))
        .await
        .unwrap();

    let err = admin_service
        .export_data(&profile_with_role(Role::Supervisor), "unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied { .. }));

    let admin = profile_with_role(Role::Admin);
    let bundle = admin_service.export_data(&admin, "10.1.2.3").await.unwrap();
    assert_eq!(bundle.drivers.len(), 1);

    // The export itself left a trail
    let entries = store.list_audit_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].table_name, "exports");
    assert_eq!(entries[0].record_id, bundle.id);
    assert_eq!(entries[0].user_id, admin.user_id);
    assert_eq!(entries[0].origin, "10.1.2.3");
}

#[tokio::test]
async fn test_export_round_trips_through_json_file() {
    let store = Arc::new(MemoryStore::new());
    let admin_service = AdminService::new(store.clone());
    let admin = profile_with_role(Role::Admin);

    store
        .upsert_driver(sample_driver("Rafael Dias"))
        .await
        .unwrap();

    let bundle = admin_service.export_data(&admin, "unknown").await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&bundle).unwrap()).unwrap();

    let loaded: ExportBundle =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(loaded.id, bundle.id);
    assert_eq!(loaded.drivers.len(), 1);
    assert_eq!(loaded.drivers[0].full_name, "Rafael Dias");

    // Import into a fresh store
    let fresh = Arc::new(MemoryStore::new());
    let fresh_admin = AdminService::new(fresh.clone());
    let summary = fresh_admin
        .import_drivers(&admin, loaded.drivers)
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 0);
}

#[tokio::test]
async fn test_import_counts_inserted_and_updated() {
    let store = Arc::new(MemoryStore::new());
    let admin_service = AdminService::new(store.clone());
    let admin = profile_with_role(Role::Admin);

    let existing = sample_driver("Joana Prado");
    store.upsert_driver(existing.clone()).await.unwrap();

    let mut changed = existing.clone();
    changed.phone = Some("+55 11 98888-7777".to_string());
    let brand_new = sample_driver("Pedro Nunes");

    let summary = admin_service
        .import_drivers(&admin, vec![changed.clone(), brand_new])
        .await
        .unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);

    let stored = store.find_driver(existing.id).await.unwrap().unwrap();
    assert_eq!(stored.phone.as_deref(), Some("+55 11 98888-7777"));
}

// ============================================================================
// Audit retention
// ============================================================================

#[tokio::test]
async fn test_purge_removes_only_entries_older_than_cutoff() {
    let store = Arc::new(MemoryStore::new());
    let admin_service = AdminService::new(store.clone());
    let admin = profile_with_role(Role::Admin);

    let now = Utc::now();
    for days_ago in [400, 200, 10, 1] {
        store
            .append_audit(AuditLogEntry {
                id: Uuid::new_v4(),
                user_id: admin.user_id,
                table_name: "drivers".to_string(),
                record_id: Uuid::new_v4(),
                field_accessed: "national_id".to_string(),
                access_reason: "historic read".to_string(),
                origin: "unknown".to_string(),
                created_at: now - Duration::days(days_ago),
            })
            .await
            .unwrap();
    }

    let err = admin_service
        .purge_audit_older_than(&profile_with_role(Role::Supervisor), now)
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::PermissionDenied { .. }));

    let purged = admin_service
        .purge_audit_older_than(&admin, now - Duration::days(90))
        .await
        .unwrap();
    assert_eq!(purged, 2);
    assert_eq!(store.list_audit_entries().await.unwrap().len(), 2);
}
