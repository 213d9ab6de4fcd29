//! Dashboard-facing surface: shared application state, the snapshot
//! endpoint, and the live event stream. The dashboard itself (rendering,
//! animations) lives outside this service and is a trusted, single-tenant
//! consumer.

pub mod dashboard;
pub mod errors;
pub mod routes;

use crate::{services::broadcast::EventBroadcaster, state::ImplStateStore};

#[derive(Clone)]
pub struct AppState {
    pub store: ImplStateStore,
    pub broadcaster: EventBroadcaster,
    pub webhook_secret: String,
}
