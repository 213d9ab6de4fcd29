use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One lifecycle transition recorded on the cached charge.
///
/// The provider reuses status names across very different failure paths, so
/// entries keep the optional detail fields instead of collapsing them into
/// the status string.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChargeStatusEntry {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
    pub source: Option<String>,
    pub message: Option<String>,
}

/// Cached view of the charge currently shown on the dashboard.
///
/// `status` is left as a plain string: the provider's charge lifecycle is an
/// open set, unlike the enumerated customer/paykey statuses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChargeSnapshot {
    pub id: String,
    /// Token of the paykey funding this charge
    pub paykey: String,
    /// Amount in cents
    pub amount: i64,
    pub currency: String,
    pub status: String,
    /// Append-only, deduplicated history of status transitions
    pub status_history: Vec<ChargeStatusEntry>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}

/// Patch applied to the cached charge by an accepted `charge.*` webhook.
///
/// `status_history` is the full resulting history (append already applied by
/// the reconciler); `completed_at`/`failure_reason` overwrite even when
/// `None`, mirroring the merge of a patch object that always carries them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeUpdate {
    pub status: String,
    pub status_history: Vec<ChargeStatusEntry>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}
