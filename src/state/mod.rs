//! Resource state store: one cached snapshot per resource kind.
//!
//! The store is the single writer point for the demo. Mutators commit the
//! snapshot synchronously and then emit a typed change notification, so
//! subscribers never observe a partial mutation.

pub mod memory;

use crate::models::{charge, customer, paykey};
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

/// Combined view of the three cached snapshots, as served to the dashboard.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DashboardState {
    pub customer: Option<customer::CustomerSnapshot>,
    pub paykey: Option<paykey::PaykeySnapshot>,
    pub charge: Option<charge::ChargeSnapshot>,
}

/// Change notification emitted after a committed mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "resource", content = "snapshot", rename_all = "snake_case")]
pub enum StateChange {
    Customer(customer::CustomerSnapshot),
    Paykey(paykey::PaykeySnapshot),
    Charge(charge::ChargeSnapshot),
}

/// Mutation surface of the snapshot cache.
///
/// Full setters (`set_*`) overwrite the prior snapshot and are the entry
/// point for resource-creation code; the partial updaters are what the
/// webhook reconciler calls. `set_paykey` doubles as the reconciler's
/// full-replace path.
#[cfg_attr(test, automock)]
pub trait StateStore: Send + Sync {
    fn get_state(&self) -> anyhow::Result<DashboardState>;

    fn set_customer(&self, customer: customer::CustomerSnapshot) -> anyhow::Result<()>;

    fn update_customer(&self, update: customer::CustomerUpdate) -> anyhow::Result<()>;

    fn set_paykey(&self, paykey: paykey::PaykeySnapshot) -> anyhow::Result<()>;

    fn set_charge(&self, charge: charge::ChargeSnapshot) -> anyhow::Result<()>;

    fn update_charge(&self, update: charge::ChargeUpdate) -> anyhow::Result<()>;
}

pub type ImplStateStore = std::sync::Arc<dyn StateStore>;
