//! Webhook handlers for external integrations
//!
//! This module contains the webhook ingestion pipeline for the payments
//! provider: signature verification, payload validation, reconciliation
//! into the state store, and fan-out to live subscribers.
//!
//! ## Modules
//!
//! - [`straddle`] - Straddle payments provider webhook handlers
//! - [`errors`] - HTTP error taxonomy for the webhook boundary
//! - [`routes`] - route wiring

pub mod errors;
pub mod routes;
pub mod straddle;
