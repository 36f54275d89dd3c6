//! Roles and access levels
//!
//! Both the base role and the elevated access level are closed enums with a
//! single, centrally defined ordering and duration table. Call sites compare
//! variants, never strings, so the hierarchy cannot silently diverge.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;

// ============================================================================
// Role
// ============================================================================

/// Baseline permission tier of a profile, independent of any session.
///
/// Ordered: `Operator < Inspector < Supervisor < Admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Operator,
    Inspector,
    Supervisor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Inspector => "inspector",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Role::Operator),
            "inspector" => Ok(Role::Inspector),
            "supervisor" => Ok(Role::Supervisor),
            "admin" => Ok(Role::Admin),
            other => Err(AccessError::validation(format!("unknown role '{}'", other))),
        }
    }
}

// ============================================================================
// Access Level
// ============================================================================

/// Named disclosure tier for sensitive driver data.
///
/// Ordered: `Basic < Sensitive < FullPii`. `Basic` never requires a session;
/// the two elevated tiers are granted only through a time-boxed
/// sensitive-access session with a stated justification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Basic,
    Sensitive,
    FullPii,
}

impl AccessLevel {
    /// Fixed grant duration for a session at this level.
    ///
    /// The broader the disclosure, the shorter the grant. `Basic` carries a
    /// nominal duration only; no session is ever issued for it.
    pub fn grant_duration(&self) -> Duration {
        match self {
            AccessLevel::FullPii => Duration::minutes(30),
            AccessLevel::Sensitive => Duration::minutes(60),
            AccessLevel::Basic => Duration::minutes(120),
        }
    }

    /// Whether a session at this level may be requested at all.
    pub fn requires_session(&self) -> bool {
        !matches!(self, AccessLevel::Basic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Basic => "basic",
            AccessLevel::Sensitive => "sensitive",
            AccessLevel::FullPii => "full_pii",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(AccessLevel::Basic),
            "sensitive" => Ok(AccessLevel::Sensitive),
            "full_pii" => Ok(AccessLevel::FullPii),
            other => Err(AccessError::validation(format!(
                "unknown access level '{}'",
                other
            ))),
        }
    }
}
