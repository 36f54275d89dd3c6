//! Role registry
//!
//! One profile per authenticated identity. Profiles are auto-provisioned on
//! first sign-in; role changes are admin-only mutations and never
//! self-service.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::access::level::Role;
use crate::error::{AccessError, AccessResult};
use crate::models::Profile;
use crate::store::SharedStore;

#[derive(Clone)]
pub struct RoleRegistry {
    store: SharedStore,
}

impl RoleRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Return the profile for an identity, provisioning it on first call.
    ///
    /// Never fails with "not found"; the only failure mode is the backing
    /// store being unavailable. The store guarantees two rapid calls for a
    /// brand-new identity produce a single profile.
    pub async fn get_or_create_profile(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> AccessResult<Profile> {
        let candidate = Profile::provision(user_id, email, Utc::now());
        let provisioned_id = candidate.id;
        let profile = self.store.insert_profile_if_absent(candidate).await?;
        if profile.id == provisioned_id {
            info!(user_id = %user_id, role = %profile.role, "profile auto-provisioned");
        }
        Ok(profile)
    }

    /// Change a profile's role. Admin-only; an admin cannot change their own
    /// role through this call.
    pub async fn update_role(
        &self,
        actor: &Profile,
        target_profile_id: Uuid,
        new_role: Role,
    ) -> AccessResult<Profile> {
        if !actor.role.is_admin() {
            return Err(AccessError::permission_denied("update_role"));
        }
        if actor.id == target_profile_id {
            return Err(AccessError::permission_denied(
                "update_role: self-service role change",
            ));
        }

        let updated = self
            .store
            .update_profile_role(target_profile_id, new_role, Utc::now())
            .await?
            .ok_or_else(|| AccessError::not_found(format!("profile {}", target_profile_id)))?;

        info!(
            target = %target_profile_id,
            role = %new_role,
            by = %actor.user_id,
            "profile role updated"
        );
        Ok(updated)
    }

    /// Remove a user's profile. Admin-only. Audit entries referencing the
    /// user are retained; identity removal happens at the identity provider.
    pub async fn delete_user(&self, actor: &Profile, target_profile_id: Uuid) -> AccessResult<()> {
        if !actor.role.is_admin() {
            return Err(AccessError::permission_denied("delete_user"));
        }

        let deleted = self.store.delete_profile(target_profile_id).await?;
        if !deleted {
            return Err(AccessError::not_found(format!(
                "profile {}",
                target_profile_id
            )));
        }

        info!(target = %target_profile_id, by = %actor.user_id, "user profile deleted");
        Ok(())
    }

    pub async fn find_profile(&self, profile_id: Uuid) -> AccessResult<Option<Profile>> {
        self.store.find_profile(profile_id).await
    }
}
