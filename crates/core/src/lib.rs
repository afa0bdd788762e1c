//! Shared building blocks of the Kafka bus dispatcher: identity, connection
//! settings, the stop signal, the error taxonomy, logging configuration and
//! the collaborator traits the runtime is built against.

pub mod errors;
pub mod logging;
pub mod models;
pub mod stop_signal;
pub mod traits;

pub use errors::*;
pub use logging::{dispatcher_span, LogConfig, LogLevel, OutputFormat};
pub use models::{
    BusReference, ConnectionConfig, ResourceChange, ResourceKey, ResourceKind, RuntimeOptions,
    WorkItem, BUS_TYPE, DISPATCHER_COMPONENT,
};
pub use stop_signal::{StopSignal, StopTrigger};
pub use traits::{BrokerClient, Reconciler};

/// 统一的Result类型
pub type BusResult<T> = std::result::Result<T, BusError>;
