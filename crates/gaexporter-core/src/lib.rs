//! gaexporter core: naming rules, query result shapes, and the shared error type.
//!
//! This crate carries no runtime or transport dependencies so the mapping from
//! realtime rows to series can be tested and reused on its own.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod naming;
pub mod query;

/// Shared result type.
pub use error::{ExporterError, Result};
