//! Role registry entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::level::Role;

/// One profile per authenticated identity, mapping it to a display name,
/// email, and baseline role. Auto-provisioned on first sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Opaque identity-provider user id
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build the auto-provisioned profile for a first sign-in.
    ///
    /// The registered email doubles as the display name until the user
    /// edits it, and the role starts at the least privileged tier.
    pub fn provision(user_id: Uuid, email: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            email: email.to_string(),
            display_name: email.to_string(),
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_defaults() {
        let now = Utc::now();
        let profile = Profile::provision(Uuid::new_v4(), "ana@example.com", now);
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(profile.display_name, "ana@example.com");
        assert_eq!(profile.role, Role::Operator);
        assert_eq!(profile.created_at, now);
    }
}
