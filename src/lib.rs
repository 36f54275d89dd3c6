//! Vistoria - vehicle-inspection management backend core
//!
//! This crate implements the tiered sensitive-data access-control model
//! behind the inspection application: the role registry, time-boxed
//! elevated-access sessions, the field masking policy for driver PII, and
//! the append-only audit log, plus the thin administrative operations
//! (export/import, retention cleanup) that sit next to them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vistoria::{AccessLevel, MemoryStore, SessionManager};
//!
//! # async fn demo() -> Result<(), vistoria::AccessError> {
//! let store = Arc::new(MemoryStore::new());
//! let sessions = SessionManager::new(store);
//! let grant = sessions
//!     .create_session(uuid::Uuid::new_v4(), AccessLevel::Sensitive, "routine check")
//!     .await?;
//! println!("token {} expires {}", grant.token, grant.expires_at);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Access-control core: roles, sessions, masking, audit
pub mod access;

// Domain model types
pub mod models;

// Storage abstraction and in-memory implementation
pub mod store;

// Administrative maintenance operations
pub mod admin;

// Startup configuration
pub mod config;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

// Public re-exports
pub use access::{
    AccessLevel, AuditLog, MaskingPolicy, Role, RoleRegistry, SensitiveAccessSession,
    SensitiveFieldClass, SessionGrant, SessionManager,
};
pub use admin::{AdminService, ExportBundle, ImportSummary};
pub use config::AppConfig;
pub use error::{AccessError, AccessResult};
pub use models::{
    AuditFilter, AuditLogEntry, BasicDriverInfo, DriverRecord, MaskedDriverView, Page, Profile,
};
pub use store::{AccessStore, MemoryStore, SharedStore};

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DatabaseManager, PgStore};
