//! In-memory implementation of the snapshot cache.
//!
//! One snapshot per resource kind lives in an `RwLock`-guarded cell; the
//! reference deployment is effectively single-writer, the lock is what makes
//! a multi-worker server safe. Partial updaters are no-ops while no snapshot
//! of that kind is cached; webhooks never create a snapshot from nothing.

use super::{DashboardState, StateChange, StateStore};
use crate::consts;
use crate::models::{
    charge::{ChargeSnapshot, ChargeUpdate},
    customer::{CustomerSnapshot, CustomerUpdate},
    paykey::PaykeySnapshot,
};
use anyhow::anyhow;
use std::sync::{RwLock, RwLockWriteGuard};
use tokio::sync::broadcast;

pub struct InMemoryStateStore {
    inner: RwLock<DashboardState>,
    changes_tx: broadcast::Sender<StateChange>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        let (changes_tx, _) = broadcast::channel(consts::STATE_CHANGES_CAPACITY);

        Self {
            inner: RwLock::new(DashboardState::default()),
            changes_tx,
        }
    }

    /// Registers an in-process subscriber for committed state changes.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<StateChange> {
        self.changes_tx.subscribe()
    }

    fn write(&self) -> anyhow::Result<RwLockWriteGuard<'_, DashboardState>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("state store lock poisoned"))
    }

    /// Notifies subscribers once the snapshot is committed. Nobody listening
    /// is fine.
    fn emit(&self, change: StateChange) {
        let _ = self.changes_tx.send(change);
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn get_state(&self) -> anyhow::Result<DashboardState> {
        Ok(self
            .inner
            .read()
            .map_err(|_| anyhow!("state store lock poisoned"))?
            .clone())
    }

    fn set_customer(&self, customer: CustomerSnapshot) -> anyhow::Result<()> {
        {
            let mut state = self.write()?;
            state.customer = Some(customer.clone());
        }
        self.emit(StateChange::Customer(customer));

        Ok(())
    }

    fn update_customer(&self, update: CustomerUpdate) -> anyhow::Result<()> {
        let patched = {
            let mut state = self.write()?;
            let Some(customer) = state.customer.as_mut() else {
                return Ok(());
            };

            customer.verification_status = update.verification_status;
            customer.risk_score = update.risk_score;
            customer.clone()
        };
        self.emit(StateChange::Customer(patched));

        Ok(())
    }

    fn set_paykey(&self, paykey: PaykeySnapshot) -> anyhow::Result<()> {
        {
            let mut state = self.write()?;
            state.paykey = Some(paykey.clone());
        }
        self.emit(StateChange::Paykey(paykey));

        Ok(())
    }

    fn set_charge(&self, charge: ChargeSnapshot) -> anyhow::Result<()> {
        {
            let mut state = self.write()?;
            state.charge = Some(charge.clone());
        }
        self.emit(StateChange::Charge(charge));

        Ok(())
    }

    fn update_charge(&self, update: ChargeUpdate) -> anyhow::Result<()> {
        let patched = {
            let mut state = self.write()?;
            let Some(charge) = state.charge.as_mut() else {
                return Ok(());
            };

            charge.status = update.status;
            charge.status_history = update.status_history;
            charge.completed_at = update.completed_at;
            charge.failure_reason = update.failure_reason;
            charge.clone()
        };
        self.emit(StateChange::Charge(patched));

        Ok(())
    }
}
