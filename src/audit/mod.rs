//! Audit log for Parcela
//!
//! Every create, update and delete of an account, credit card, category or
//! transaction is appended to `audit.log` as one JSON line carrying the
//! before/after snapshots of the entity.
//!
//! Entries recorded inside [`crate::storage::Storage::atomically`] are held
//! back until the unit of work commits, so a rolled-back operation leaves no
//! trace in the log.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
