//! Straddle webhook ingestion pipeline
//!
//! Every inbound notification runs through the same sequence: signature
//! verification against the raw body, envelope validation, fan-out to live
//! subscribers, then reconciliation into the snapshot cache.

pub mod router;
pub mod routes;
pub mod schemas;
pub mod security;
