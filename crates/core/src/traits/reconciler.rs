use async_trait::async_trait;

use crate::{models::WorkItem, BusResult};

/// Applies one changed resource against the broker.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn reconcile(&self, item: &WorkItem) -> BusResult<()>;
}
