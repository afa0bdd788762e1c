use std::sync::Arc;

use async_trait::async_trait;
use bus_core::{
    traits::{BrokerClient, Reconciler},
    BusError, BusResult, ResourceChange, ResourceKind, WorkItem,
};
use tracing::debug;

/// Kafka topic backing a channel.
pub fn topic_name(namespace: &str, channel: &str) -> String {
    format!("{namespace}.{channel}")
}

/// Default reconciler: keeps one topic per channel and checks that
/// subscriptions point at a provisioned channel.
pub struct BusReconciler {
    broker: Arc<dyn BrokerClient>,
}

impl BusReconciler {
    pub fn new(broker: Arc<dyn BrokerClient>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl Reconciler for BusReconciler {
    async fn reconcile(&self, item: &WorkItem) -> BusResult<()> {
        let key = &item.key;

        match (key.kind, &item.change) {
            (ResourceKind::Channel, ResourceChange::Upserted { .. }) => {
                self.broker
                    .ensure_topic(&topic_name(&key.namespace, &key.name))
                    .await
            }
            (ResourceKind::Channel, ResourceChange::Deleted) => {
                self.broker
                    .delete_topic(&topic_name(&key.namespace, &key.name))
                    .await
            }
            (ResourceKind::Subscription, ResourceChange::Upserted { channel }) => {
                let channel = channel.as_deref().ok_or_else(|| {
                    BusError::Reconcile(format!("{key} does not reference a channel"))
                })?;
                let topic = topic_name(&key.namespace, channel);
                if !self.broker.topic_exists(&topic).await? {
                    return Err(BusError::Reconcile(format!(
                        "{key} references channel {channel} whose topic {topic} does not exist"
                    )));
                }
                debug!(subscription = %key, topic = %topic, "subscription bound to topic");
                Ok(())
            }
            (ResourceKind::Subscription, ResourceChange::Deleted) => {
                debug!(subscription = %key, "subscription removed");
                Ok(())
            }
        }
    }
}
