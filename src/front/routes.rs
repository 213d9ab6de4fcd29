use ntex::web;

/// Configures dashboard-facing routes.
///
/// # Routes
/// - `GET /api/state` - current snapshot of all cached resources
/// - `GET /events` - live event stream (SSE)
pub fn dashboard(cfg: &mut web::ServiceConfig) {
    cfg.service((super::dashboard::get_state, super::dashboard::events));
}
