//! Straddle webhook endpoint (POST)
//!
//! Sequencing matters here: signature verification runs against the raw
//! unparsed body first, the body is parsed and validated only afterwards,
//! and the broadcast + reconciliation happen only for requests that passed
//! both. The fan-out does not wait for subscriber acknowledgment; the 200
//! only acknowledges receipt.

use super::{router, schemas::WebhookEnvelope, security};
use crate::{consts, front::AppState, webhook::errors::WebhookError};
use log::warn;
use ntex::{util::Bytes, web};

fn header_value(req: &web::HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Receives lifecycle webhooks from the payments provider.
///
/// # Responses
/// - 200 `{"received":true}`: verified, validated, broadcast, reconciled
/// - 400 missing signature headers / invalid payload
/// - 401 present but wrong signature
/// - 500 store failure while reconciling; detail stays in the logs
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let headers = security::SignatureHeaders {
        message_id: header_value(&req, consts::HEADER_MESSAGE_ID),
        timestamp: header_value(&req, consts::HEADER_TIMESTAMP),
        signature: header_value(&req, consts::HEADER_SIGNATURE),
    };

    if let Err(err) = security::verify_signature(&headers, &body, &app_state.webhook_secret) {
        let rejection = match err {
            security::SignatureError::MissingHeaders => WebhookError::MissingSignatureHeaders,
            security::SignatureError::InvalidSignature => WebhookError::InvalidSignature,
        };
        return Err(rejection.into());
    }

    let parsed: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("webhook body is not valid JSON: {}", err);
            return Err(WebhookError::InvalidPayload.into());
        }
    };
    let envelope =
        WebhookEnvelope::validate(&parsed).map_err(|_| WebhookError::InvalidPayload)?;

    // Every accepted webhook reaches the subscribers, whether or not it
    // matches a cached snapshot below.
    let fan_out = serde_json::to_value(&envelope)
        .map_err(|err| WebhookError::ProcessingFailed(err.to_string()))?;
    app_state
        .broadcaster
        .broadcast(consts::WEBHOOK_CHANNEL, fan_out);

    router::route(&envelope, app_state.store.as_ref())
        .map_err(|err| WebhookError::ProcessingFailed(err.to_string()))?;

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({ "received": true })))
}
