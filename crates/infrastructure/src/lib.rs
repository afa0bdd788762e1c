pub mod kafka_broker;

pub use kafka_broker::*;
