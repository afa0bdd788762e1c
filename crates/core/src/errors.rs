use thiserror::Error;

/// 总线 Dispatcher 错误类型定义
#[derive(Debug, Error)]
pub enum BusError {
    /// Missing or malformed startup configuration. Fatal.
    #[error("配置错误: {0}")]
    Configuration(String),

    /// The dispatcher runtime could not be built. Fatal.
    #[error("构建Dispatcher失败: {0}")]
    Construction(String),

    #[error("Broker错误: {0}")]
    Broker(String),

    /// A single reconciliation attempt failed; recovered inside the worker.
    #[error("协调失败: {0}")]
    Reconcile(String),
}

