//! # Webhook router / reconciler
//!
//! Maps an authenticated, validated webhook onto a store mutation using
//! resource-specific idempotency rules. The cache holds a single snapshot
//! per resource kind, so every branch is guarded by an id match: a webhook
//! for a resource the operator is not currently viewing is acked without
//! touching the cache. "No matching cached resource" is never an error;
//! only store failures propagate.

use super::schemas::{ChargeEventData, CustomerEventData, PaykeyEventData, WebhookEnvelope};
use crate::models::{
    charge::{ChargeStatusEntry, ChargeUpdate},
    customer::CustomerUpdate,
    paykey::PaykeySnapshot,
};
use crate::state::StateStore;
use chrono::Utc;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reconciles one webhook into the store.
pub fn route(envelope: &WebhookEnvelope, store: &dyn StateStore) -> anyhow::Result<()> {
    let mut segments = envelope.event_type.splitn(3, '.');
    let resource = segments.next().unwrap_or_default();
    let kind = segments.next().unwrap_or_default();

    if !matches!(kind, "created" | "event") {
        debug!(
            "webhook {}: event type {} is not reconciled",
            envelope.event_id, envelope.event_type
        );
        return Ok(());
    }

    match resource {
        "customer" => route_customer(envelope, store),
        "paykey" => route_paykey(envelope, store),
        "charge" => route_charge(envelope, store),
        _ => {
            debug!(
                "webhook {}: unknown resource in event type {}",
                envelope.event_id, envelope.event_type
            );
            Ok(())
        }
    }
}

/// Decodes the `data` object into the resource-specific shape. A payload
/// missing `id`/`status` (or carrying unknown status values) fails the
/// guard, not the request.
fn decode<T: DeserializeOwned>(envelope: &WebhookEnvelope) -> Option<T> {
    serde_json::from_value(Value::Object(envelope.data.clone())).ok()
}

fn route_customer(envelope: &WebhookEnvelope, store: &dyn StateStore) -> anyhow::Result<()> {
    let Some(data) = decode::<CustomerEventData>(envelope) else {
        return Ok(());
    };
    if store
        .get_state()?
        .customer
        .is_none_or(|cached| cached.id != data.id)
    {
        debug!(
            "webhook {}: no cached customer matches {}",
            envelope.event_id, data.id
        );
        return Ok(());
    }

    store.update_customer(CustomerUpdate {
        verification_status: data.status,
        risk_score: data.risk_score,
    })
}

fn route_paykey(envelope: &WebhookEnvelope, store: &dyn StateStore) -> anyhow::Result<()> {
    let Some(data) = decode::<PaykeyEventData>(envelope) else {
        return Ok(());
    };
    let Some(cached) = store.get_state()?.paykey.filter(|p| p.id == data.id) else {
        debug!(
            "webhook {}: no cached paykey matches {}",
            envelope.event_id, data.id
        );
        return Ok(());
    };

    // Full replace, cached fields carried over first and payload fields
    // overwriting. Unlike customer/charge this does not patch in place.
    store.set_paykey(PaykeySnapshot {
        id: data.id,
        token: data.token.unwrap_or(cached.token),
        customer_id: data.customer_id.unwrap_or(cached.customer_id),
        status: data.status,
        created_at: data.created_at.unwrap_or(cached.created_at),
    })
}

fn route_charge(envelope: &WebhookEnvelope, store: &dyn StateStore) -> anyhow::Result<()> {
    let Some(data) = decode::<ChargeEventData>(envelope) else {
        return Ok(());
    };
    let Some(cached) = store.get_state()?.charge.filter(|c| c.id == data.id) else {
        debug!(
            "webhook {}: no cached charge matches {}",
            envelope.event_id, data.id
        );
        return Ok(());
    };

    let details = data.status_details.unwrap_or_default();
    let candidate = ChargeStatusEntry {
        status: data.status.clone(),
        timestamp: data.updated_at.unwrap_or_else(Utc::now),
        reason: details.reason,
        source: details.source,
        message: details.message,
    };

    // Append-only history; an entry identical to the current last one
    // (field for field) is a redelivery and collapses into it.
    let mut status_history = cached.status_history;
    if status_history.last() != Some(&candidate) {
        status_history.push(candidate);
    }

    store.update_charge(ChargeUpdate {
        status: data.status,
        status_history,
        completed_at: data.completed_at,
        failure_reason: data.failure_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        charge::ChargeSnapshot,
        customer::{CustomerSnapshot, VerificationStatus},
        paykey::PaykeyStatus,
    };
    use crate::state::{DashboardState, MockStateStore};
    use chrono::{DateTime, TimeZone};
    use mockall::predicate::eq;
    use serde_json::json;

    fn envelope(event_type: &str, data: serde_json::Value) -> WebhookEnvelope {
        WebhookEnvelope::validate(&json!({
            "event_type": event_type,
            "event_id": "evt_test",
            "data": data
        }))
        .unwrap()
    }

    fn cached_customer(id: &str) -> CustomerSnapshot {
        CustomerSnapshot {
            id: id.into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+15555550100".into(),
            verification_status: VerificationStatus::Pending,
            risk_score: None,
        }
    }

    fn cached_paykey(id: &str) -> PaykeySnapshot {
        PaykeySnapshot {
            id: id.into(),
            token: "paykey_token_1".into(),
            customer_id: "cust_1".into(),
            status: PaykeyStatus::Pending,
            created_at: created_at(),
        }
    }

    fn cached_charge(id: &str) -> ChargeSnapshot {
        ChargeSnapshot {
            id: id.into(),
            paykey: "paykey_token_1".into(),
            amount: 2500,
            currency: "usd".into(),
            status: "created".into(),
            status_history: vec![],
            completed_at: None,
            failure_reason: None,
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store_with(state: DashboardState) -> MockStateStore {
        let mut store = MockStateStore::new();
        store
            .expect_get_state()
            .returning(move || Ok(state.clone()));
        store
    }

    #[test]
    fn test_matching_customer_webhook_patches_status_and_risk() {
        let mut store = store_with(DashboardState {
            customer: Some(cached_customer("cust_1")),
            ..Default::default()
        });
        store
            .expect_update_customer()
            .with(eq(CustomerUpdate {
                verification_status: VerificationStatus::Verified,
                risk_score: Some(0.1),
            }))
            .times(1)
            .returning(|_| Ok(()));

        let envelope = envelope(
            "customer.created.v1",
            json!({"id": "cust_1", "status": "verified", "risk_score": 0.1}),
        );
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_customer_id_mismatch_is_a_noop() {
        let store = store_with(DashboardState {
            customer: Some(cached_customer("cust_X")),
            ..Default::default()
        });

        let envelope = envelope(
            "customer.created.v1",
            json!({"id": "cust_1", "status": "verified", "risk_score": 0.1}),
        );
        // no update_customer expectation: any call would panic the mock
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_customer_webhook_without_status_is_a_noop() {
        let store = MockStateStore::new();

        let envelope = envelope("customer.event.v1", json!({"id": "cust_1"}));
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_unhandled_event_types_are_acked_without_mutation() {
        let store = MockStateStore::new();

        for event_type in ["payout.created.v1", "customer.deleted.v1", "ping"] {
            let envelope = envelope(event_type, json!({"id": "cust_1", "status": "verified"}));
            route(&envelope, &store).unwrap();
        }
    }

    #[test]
    fn test_matching_paykey_webhook_replaces_wholesale() {
        let mut store = store_with(DashboardState {
            paykey: Some(cached_paykey("paykey_1")),
            ..Default::default()
        });
        // token comes from the payload, customer_id/created_at survive from
        // the cached snapshot
        store
            .expect_set_paykey()
            .with(eq(PaykeySnapshot {
                id: "paykey_1".into(),
                token: "paykey_token_2".into(),
                customer_id: "cust_1".into(),
                status: PaykeyStatus::Active,
                created_at: created_at(),
            }))
            .times(1)
            .returning(|_| Ok(()));

        let envelope = envelope(
            "paykey.event.v1",
            json!({"id": "paykey_1", "status": "active", "token": "paykey_token_2"}),
        );
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_paykey_id_mismatch_is_a_noop() {
        let store = store_with(DashboardState {
            paykey: Some(cached_paykey("paykey_X")),
            ..Default::default()
        });

        let envelope = envelope("paykey.event.v1", json!({"id": "paykey_1", "status": "active"}));
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_matching_charge_webhook_appends_history_entry() {
        let mut store = store_with(DashboardState {
            charge: Some(cached_charge("charge_1")),
            ..Default::default()
        });
        let updated_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        store
            .expect_update_charge()
            .with(eq(ChargeUpdate {
                status: "failed".into(),
                status_history: vec![ChargeStatusEntry {
                    status: "failed".into(),
                    timestamp: updated_at,
                    reason: Some("insufficient_funds".into()),
                    source: Some("bank_decline".into()),
                    message: Some("R01".into()),
                }],
                completed_at: None,
                failure_reason: Some("insufficient_funds".into()),
            }))
            .times(1)
            .returning(|_| Ok(()));

        let envelope = envelope(
            "charge.event.v1",
            json!({
                "id": "charge_1",
                "status": "failed",
                "updated_at": updated_at.to_rfc3339(),
                "failure_reason": "insufficient_funds",
                "status_details": {
                    "reason": "insufficient_funds",
                    "source": "bank_decline",
                    "message": "R01"
                }
            }),
        );
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_identical_charge_redelivery_does_not_grow_history() {
        let updated_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let last = ChargeStatusEntry {
            status: "paid".into(),
            timestamp: updated_at,
            reason: None,
            source: None,
            message: None,
        };
        let mut charge = cached_charge("charge_1");
        charge.status_history = vec![last.clone()];

        let mut store = store_with(DashboardState {
            charge: Some(charge),
            ..Default::default()
        });
        store
            .expect_update_charge()
            .with(eq(ChargeUpdate {
                status: "paid".into(),
                status_history: vec![last],
                completed_at: Some(updated_at),
                failure_reason: None,
            }))
            .times(1)
            .returning(|_| Ok(()));

        let envelope = envelope(
            "charge.event.v1",
            json!({
                "id": "charge_1",
                "status": "paid",
                "updated_at": updated_at.to_rfc3339(),
                "completed_at": updated_at.to_rfc3339()
            }),
        );
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_charge_id_mismatch_is_a_noop() {
        let store = store_with(DashboardState {
            charge: Some(cached_charge("charge_X")),
            ..Default::default()
        });

        let envelope = envelope("charge.event.v1", json!({"id": "charge_1", "status": "paid"}));
        route(&envelope, &store).unwrap();
    }

    #[test]
    fn test_empty_cache_acks_everything() {
        let store = store_with(DashboardState::default());

        for (event_type, data) in [
            ("customer.event.v1", json!({"id": "cust_1", "status": "verified"})),
            ("paykey.event.v1", json!({"id": "paykey_1", "status": "active"})),
            ("charge.event.v1", json!({"id": "charge_1", "status": "paid"})),
        ] {
            let envelope = envelope(event_type, data);
            route(&envelope, &store).unwrap();
        }
    }

    #[test]
    fn test_store_failures_propagate() {
        let mut store = MockStateStore::new();
        store
            .expect_get_state()
            .returning(|| Err(anyhow::anyhow!("state store lock poisoned")));

        let envelope = envelope("customer.event.v1", json!({"id": "cust_1", "status": "verified"}));
        assert!(route(&envelope, &store).is_err());
    }
}
