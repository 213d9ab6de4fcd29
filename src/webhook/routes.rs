use ntex::web;

/// Configures webhook routes for the external payments provider.
///
/// These are public endpoints: authenticity comes from the signature
/// headers, not from a session.
///
/// # Routes
/// - `POST /webhooks/straddle` - Straddle webhook receiver
pub fn straddle(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhooks/straddle").service(super::straddle::routes::receive));
}
