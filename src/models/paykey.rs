use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaykeyStatus {
    // Bank account link initiated, not yet usable
    #[default]
    #[display("pending")]
    Pending,
    // Paykey can fund charges
    #[display("active")]
    Active,
    // Held back for manual review
    #[display("review")]
    Review,
    // Link rejected by the provider
    #[display("rejected")]
    Rejected,
    // Deactivated, no longer chargeable
    #[display("inactive")]
    Inactive,
}

/// Cached view of the bank-account paykey currently shown on the dashboard.
///
/// Unlike the customer and charge snapshots this one is replaced wholesale by
/// accepted `paykey.*` webhooks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PaykeySnapshot {
    pub id: String,
    pub token: String,
    pub customer_id: String,
    pub status: PaykeyStatus,
    pub created_at: DateTime<Utc>,
}
