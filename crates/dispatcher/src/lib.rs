//! Kafka bus dispatcher runtime.
//!
//! Owns the reconciliation worker pool: the resource watch feeds a
//! [`WorkQueue`], workers pull items from it and apply them against the
//! broker until the [`StopSignal`](bus_core::StopSignal) fires, and
//! [`KafkaBusDispatcher::run`] returns once every worker has drained.

pub mod reconciler;
pub mod runtime;
pub mod work_queue;
mod worker;

pub use reconciler::{topic_name, BusReconciler};
pub use runtime::{BusDispatcher, KafkaBusDispatcher};
pub use work_queue::WorkQueue;
