use std::fmt;

/// Broker technology tag attached to every log line.
pub const BUS_TYPE: &str = "kafka";

/// Role of this process within the bus.
pub const DISPATCHER_COMPONENT: &str = "dispatcher";

/// Identifies exactly one logical bus instance cluster-wide.
///
/// No validation happens here: empty fields are accepted and any failure
/// they cause surfaces in the dispatcher constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BusReference {
    name: String,
    namespace: String,
}

impl BusReference {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// 从 `BUS_NAME` / `BUS_NAMESPACE` 解析，缺失时为空字符串
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup("BUS_NAME").unwrap_or_default(),
            lookup("BUS_NAMESPACE").unwrap_or_default(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for BusReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
