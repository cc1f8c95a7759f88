//! Bounded, append-only audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dvhs_core::AuditEntryId;

/// Only the most recent entries are retained; older ones are evicted,
/// not archived.
pub const LOG_CAP: usize = 100;

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Edit,
    Delete,
}

/// One audit-trail entry. Entries are never edited or individually
/// removed; the trail is read-only outside the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: AuditAction,
    pub module: String,
    pub details: String,
}

/// Prepend an entry (most-recent-first) and evict beyond the cap.
pub(crate) fn record(
    logs: &mut Vec<AuditEntry>,
    user: &str,
    action: AuditAction,
    module: &str,
    details: impl Into<String>,
) {
    logs.insert(
        0,
        AuditEntry {
            id: AuditEntryId::new(),
            timestamp: Utc::now(),
            user: user.to_string(),
            action,
            module: module.to_string(),
            details: details.into(),
        },
    );
    logs.truncate(LOG_CAP);
}
