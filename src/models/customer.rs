use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Display)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    // Identity checks have not finished yet
    #[default]
    #[display("pending")]
    Pending,
    // Identity verified, customer can transact
    #[display("verified")]
    Verified,
    // Flagged for manual review by the provider
    #[display("review")]
    Review,
    // Identity verification failed
    #[display("rejected")]
    Rejected,
}

/// Cached view of the customer currently shown on the dashboard.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CustomerSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub verification_status: VerificationStatus,
    pub risk_score: Option<f64>,
}

/// Patch applied to the cached customer by an accepted `customer.*` webhook.
///
/// Carries every key the reconciler writes, so an absent `risk_score` in the
/// payload clears the cached one (merge semantics of the patch object).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerUpdate {
    pub verification_status: VerificationStatus,
    pub risk_score: Option<f64>,
}
