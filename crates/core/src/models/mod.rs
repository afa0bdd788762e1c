pub mod bus;
pub mod connection;
pub mod options;
pub mod work_item;

pub use bus::{BusReference, BUS_TYPE, DISPATCHER_COMPONENT};
pub use connection::ConnectionConfig;
pub use options::RuntimeOptions;
pub use work_item::{ResourceChange, ResourceKey, ResourceKind, WorkItem};
