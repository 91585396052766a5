//! Collection loop: dimension lookup, the per-metric worker, and the scheduler.

mod dimensions;
mod scheduler;
mod worker;

pub use dimensions::DimensionResolver;
pub use scheduler::Scheduler;
pub use worker::{Collector, RunSummary};
