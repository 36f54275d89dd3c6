//! Domain model types shared across the access-control core

pub mod audit;
pub mod driver;
pub mod profile;

pub use audit::{AuditFilter, AuditLogEntry, Page};
pub use driver::{BasicDriverInfo, DriverRecord, MaskedDriverView};
pub use profile::Profile;
