//! Sensitive-access session manager
//!
//! Issues, validates, revokes, and expires time-boxed elevated-access
//! grants. Sessions are written once at creation and never updated, except
//! for the one-shot revocation timestamp. There is no renewal: an expired
//! grant must be recreated from scratch with fresh justification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::access::level::AccessLevel;
use crate::error::{AccessError, AccessResult};
use crate::models::Profile;
use crate::store::SharedStore;

// ============================================================================
// Types
// ============================================================================

/// A time-boxed elevated-access grant scoped to a named access level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveAccessSession {
    /// Opaque session token
    pub token: Uuid,
    /// Owning identity (profile user id)
    pub user_id: Uuid,
    pub level: AccessLevel,
    pub justification: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once by an admin revocation; never cleared
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SensitiveAccessSession {
    pub fn new(
        user_id: Uuid,
        level: AccessLevel,
        justification: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_id,
            level,
            justification: justification.to_string(),
            created_at: now,
            expires_at: now + level.grant_duration(),
            revoked_at: None,
        }
    }

    /// Pure function of the supplied timestamp; never mutates expiry.
    /// Exactly at `expires_at` the session counts as expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

/// Token and expiry handed back to the caller on session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Session Manager
// ============================================================================

/// Issues and revokes sensitive-access sessions against a backing store.
#[derive(Clone)]
pub struct SessionManager {
    store: SharedStore,
}

impl SessionManager {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Issue an elevated-access grant.
    ///
    /// Deliberately does not check the actor's base role: the manager issues
    /// the grant, the masking policy and row-level store authorization
    /// independently decide who may benefit from it.
    pub async fn create_session(
        &self,
        actor_user_id: Uuid,
        level: AccessLevel,
        justification: &str,
    ) -> AccessResult<SessionGrant> {
        if !level.requires_session() {
            return Err(AccessError::validation(
                "basic access requires no session; request 'sensitive' or 'full_pii'",
            ));
        }
        let justification = justification.trim();
        if justification.is_empty() {
            return Err(AccessError::validation("justification must not be empty"));
        }

        let now = Utc::now();
        let session = SensitiveAccessSession::new(actor_user_id, level, justification, now);
        let grant = SessionGrant {
            token: session.token,
            expires_at: session.expires_at,
        };
        self.store.insert_session(session).await?;

        info!(
            user_id = %actor_user_id,
            level = %level,
            expires_at = %grant.expires_at,
            "sensitive-access session created"
        );
        Ok(grant)
    }

    pub async fn find_session(
        &self,
        token: Uuid,
    ) -> AccessResult<Option<SensitiveAccessSession>> {
        self.store.find_session(token).await
    }

    /// Cut a live grant short. Admin-only; a grant that is already revoked
    /// or naturally expired cannot be revoked again.
    pub async fn revoke(
        &self,
        actor: &Profile,
        token: Uuid,
    ) -> AccessResult<SensitiveAccessSession> {
        if !actor.role.is_admin() {
            return Err(AccessError::permission_denied("revoke_session"));
        }

        let session = self
            .store
            .find_session(token)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("session {}", token)))?;

        let now = Utc::now();
        if session.revoked_at.is_some() {
            return Err(AccessError::validation("session is already revoked"));
        }
        if now >= session.expires_at {
            return Err(AccessError::validation("session has already expired"));
        }

        let revoked = self
            .store
            .revoke_session(token, now)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("session {}", token)))?;

        info!(token = %token, by = %actor.user_id, "sensitive-access session revoked");
        Ok(revoked)
    }
}
