use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde_json::json;

/// Everything a webhook sender can observe when a request is rejected.
///
/// Internal failure detail stays in the logs; the 500 body always carries
/// `details: null`.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    MissingSignatureHeaders,
    InvalidSignature,
    InvalidPayload,
    ProcessingFailed(#[error(not(source))] String),
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        let body = match self {
            WebhookError::MissingSignatureHeaders => {
                json!({"error": "Missing webhook signature headers"})
            }
            WebhookError::InvalidSignature => json!({"error": "Invalid webhook signature"}),
            WebhookError::InvalidPayload => json!({"error": "Invalid webhook payload"}),
            WebhookError::ProcessingFailed(details) => {
                error!("webhook processing failed: {}", details);
                json!({"error": "Webhook processing failed", "details": null})
            }
        };

        web::HttpResponse::build(self.status_code()).json(&body)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::MissingSignatureHeaders | WebhookError::InvalidPayload => {
                http::StatusCode::BAD_REQUEST
            }
            WebhookError::InvalidSignature => http::StatusCode::UNAUTHORIZED,
            WebhookError::ProcessingFailed(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
