//! Security utilities for Straddle webhook verification
//!
//! Straddle signs every webhook with HMAC-SHA256 over the string
//! `"{message_id}.{timestamp}.{raw_body}"` using the endpoint's shared
//! secret. The signature header carries one or more base64 values prefixed
//! with `v1,`, whitespace-separated while keys rotate; the request is
//! authentic if any supplied value matches the recomputation.
//!
//! # Important Notes
//!
//! - The signature MUST be computed on the raw request body bytes, not parsed JSON
//! - The comparison must be constant-time to prevent timing attacks
//! - No timestamp tolerance is enforced; the timestamp only participates as
//!   signed content

use crate::consts;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use derive_more::{Display, Error};
use hmac::{Hmac, Mac};
use log::{error, warn};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Why verification failed. Callers map the two cases to distinct status
/// codes, so absent headers must never be reported as a bad signature.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum SignatureError {
    MissingHeaders,
    InvalidSignature,
}

/// The three signature headers as read from the request, any of which may be
/// absent.
#[derive(Debug, Default)]
pub struct SignatureHeaders {
    pub message_id: Option<String>,
    pub timestamp: Option<String>,
    pub signature: Option<String>,
}

/// Verifies the webhook signature headers against the raw request payload.
pub fn verify_signature(
    headers: &SignatureHeaders,
    payload: &[u8],
    secret: &str,
) -> Result<(), SignatureError> {
    let (Some(message_id), Some(timestamp), Some(signature)) = (
        headers.message_id.as_deref(),
        headers.timestamp.as_deref(),
        headers.signature.as_deref(),
    ) else {
        warn!("webhook request is missing one or more signature headers");
        return Err(SignatureError::MissingHeaders);
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(err) => {
            error!("failed to create HMAC instance: {}", err);
            return Err(SignatureError::InvalidSignature);
        }
    };
    mac.update(message_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let computed = mac.finalize().into_bytes();

    // The header may list several values, space or comma delimited, while
    // the sender rotates keys; any one match authenticates the request.
    for candidate in signature
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        let encoded = candidate
            .strip_prefix(consts::SIGNATURE_VERSION_PREFIX)
            .unwrap_or(candidate);

        let Ok(supplied) = BASE64.decode(encoded) else {
            continue;
        };

        if bool::from(computed.ct_eq(&supplied[..])) {
            return Ok(());
        }
    }

    warn!("webhook signature verification failed: no supplied value matched");
    Err(SignatureError::InvalidSignature)
}
