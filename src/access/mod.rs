//! Tiered sensitive-data access control
//!
//! The core of the backend: role registry, time-boxed elevated-access
//! sessions, the field masking policy, and the append-only audit log.
//!
//! Data flow: a consumer requests driver data, the masking policy checks
//! the caller's role and any active session against one request timestamp,
//! audits every disclosure, and only then returns the (possibly redacted)
//! view.

pub mod audit_log;
pub mod level;
pub mod masking;
pub mod registry;
pub mod session;

pub use audit_log::AuditLog;
pub use level::{AccessLevel, Role};
pub use masking::{MaskingPolicy, SensitiveFieldClass};
pub use registry::RoleRegistry;
pub use session::{SensitiveAccessSession, SessionGrant, SessionManager};
