//! Wire schemas for Straddle webhook payloads
//!
//! The envelope check is deliberately minimal: the provider versions event
//! payloads freely, so only the fields the pipeline itself depends on are
//! required. Resource-specific `data` shapes are decoded later by the
//! reconciler, and a decode failure there is a no-op rather than a
//! rejection.

use crate::models::{customer::VerificationStatus, paykey::PaykeyStatus};
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform rejection for a body without the minimal envelope shape. Which
/// field failed is deliberately not surfaced to the sender.
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("invalid webhook payload")]
pub struct ValidationError;

/// Validated, typed representation of a webhook body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookEnvelope {
    /// Dot-delimited `resource.event.version` string
    pub event_type: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub data: Map<String, Value>,
}

impl WebhookEnvelope {
    /// Checks the minimal required shape of a parsed webhook body:
    /// a JSON object with non-empty `event_type` and `event_id` strings and
    /// a `data` object (not null, array, or primitive).
    pub fn validate(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError)?;

        let event_type = object
            .get("event_type")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError)?;

        let event_id = object
            .get("event_id")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError)?;

        let account_id = object
            .get("account_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let data = object
            .get("data")
            .and_then(Value::as_object)
            .cloned()
            .ok_or(ValidationError)?;

        Ok(Self {
            event_type: event_type.to_string(),
            event_id: event_id.to_string(),
            account_id,
            data,
        })
    }
}

/// Fields of a `customer.*` event the reconciler cares about.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CustomerEventData {
    pub id: String,
    pub status: VerificationStatus,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

/// Fields of a `paykey.*` event; optional fields fall back to the cached
/// snapshot during the full replace.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaykeyEventData {
    pub id: String,
    pub status: PaykeyStatus,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields of a `charge.*` event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChargeEventData {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub status_details: Option<ChargeStatusDetails>,
}

/// Optional detail block accompanying a charge status transition.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChargeStatusDetails {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
