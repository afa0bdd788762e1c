pub mod broker;
pub mod reconciler;

pub use broker::*;
pub use reconciler::*;
