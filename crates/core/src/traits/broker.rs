use async_trait::async_trait;

use crate::BusResult;

/// Broker operations the reconcilers rely on.
///
/// One client is created at construction time and shared by every worker.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Create the topic if it does not exist yet.
    async fn ensure_topic(&self, topic: &str) -> BusResult<()>;

    /// Delete the topic; deleting a missing topic is not an error.
    async fn delete_topic(&self, topic: &str) -> BusResult<()>;

    async fn topic_exists(&self, topic: &str) -> BusResult<bool>;
}
