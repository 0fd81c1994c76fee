//! Append-only audit trail of data changes
//!
//! Every create, update and delete performed by the services is recorded as
//! one JSON line in `audit.log`, with the entity before and after the change.
//! Password hashes never reach the log; users are audited through a redacted
//! view.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
