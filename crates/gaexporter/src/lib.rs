//! Top-level facade crate for gaexporter.
//!
//! Re-exports core types and the daemon library so users can depend on a single crate.

pub mod core {
    pub use gaexporter_core::*;
}

pub mod daemon {
    pub use gaexporter_daemon::*;
}
