use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bus-related resource types the dispatcher reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Channel,
    Subscription,
}

/// Identity of one watched resource; the unit of per-key ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn channel(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Channel,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn subscription(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Subscription,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ResourceKind::Channel => "channel",
            ResourceKind::Subscription => "subscription",
        };
        write!(f, "{kind}:{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResourceChange {
    /// Created or updated. A subscription carries the channel it targets.
    Upserted { channel: Option<String> },
    Deleted,
}

/// One changed bus-related resource, as delivered by the resource watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub key: ResourceKey,
    pub change: ResourceChange,
    pub observed_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn new(key: ResourceKey, change: ResourceChange) -> Self {
        Self {
            key,
            change,
            observed_at: Utc::now(),
        }
    }

    pub fn upserted(key: ResourceKey) -> Self {
        Self::new(key, ResourceChange::Upserted { channel: None })
    }

    pub fn deleted(key: ResourceKey) -> Self {
        Self::new(key, ResourceChange::Deleted)
    }
}
