//! gaexporter daemon library entry.
//!
//! Wires config and credential loading, the realtime client, the gauge
//! registry, and the poll loop into the exporter. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod collect;
pub mod config;
pub mod credentials;
pub mod obs;
pub mod ops;
pub mod router;
pub mod source;
