use std::time::Duration;

use async_trait::async_trait;
use bus_core::{traits::BrokerClient, BusError, BusResult};
use rskafka::client::{
    controller::ControllerClient,
    error::{Error as KafkaError, ProtocolError},
    Client, ClientBuilder,
};
use tracing::{debug, info, Instrument, Span};

/// Kafka 连接参数
#[derive(Debug, Clone)]
pub struct KafkaBrokerConfig {
    /// Bootstrap addresses, `host:port`
    pub brokers: Vec<String>,
    /// Upper bound for the initial metadata fetch
    pub connect_timeout: Duration,
    /// Broker-side timeout for admin requests
    pub operation_timeout: Duration,
    pub partitions: i32,
    pub replication_factor: i16,
}

impl KafkaBrokerConfig {
    pub fn new(brokers: Vec<String>) -> Self {
        Self {
            brokers,
            connect_timeout: Duration::from_secs(10),
            operation_timeout: Duration::from_secs(5),
            partitions: 1,
            replication_factor: 1,
        }
    }

    /// Every broker must be `host:port` with a non-zero port.
    pub fn validate(&self) -> BusResult<()> {
        if self.brokers.is_empty() {
            return Err(BusError::Construction("no Kafka brokers configured".to_string()));
        }
        for broker in &self.brokers {
            validate_broker_address(broker)?;
        }
        Ok(())
    }
}

fn validate_broker_address(broker: &str) -> BusResult<()> {
    let malformed = || {
        BusError::Construction(format!(
            "malformed broker address {broker:?}, expected host:port"
        ))
    };

    let (host, port) = broker.rsplit_once(':').ok_or_else(malformed)?;
    if host.is_empty() {
        return Err(malformed());
    }
    match port.parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err(malformed()),
    }
}

/// Kafka 实现，基于 rskafka
///
/// The underlying client is safe for concurrent use, so one instance is
/// shared by all workers. rskafka reports its own diagnostics through
/// `tracing`; every call here runs inside a `kafka_client` span nested under
/// the dispatcher span, which keeps those events correlated with the bus.
pub struct KafkaBrokerClient {
    client: Client,
    config: KafkaBrokerConfig,
    span: Span,
}

impl KafkaBrokerClient {
    /// 连接到Kafka集群
    pub async fn connect(config: KafkaBrokerConfig, logger: &Span) -> BusResult<Self> {
        config.validate()?;

        let span = tracing::info_span!(parent: logger, "kafka_client");
        let build = ClientBuilder::new(config.brokers.clone())
            .build()
            .instrument(span.clone());

        let client = match tokio::time::timeout(config.connect_timeout, build).await {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => {
                return Err(BusError::Construction(format!(
                    "连接Kafka失败 {:?}: {e}",
                    config.brokers
                )))
            }
            Err(_) => {
                return Err(BusError::Construction(format!(
                    "连接Kafka超时 {:?} ({}s)",
                    config.brokers,
                    config.connect_timeout.as_secs()
                )))
            }
        };

        span.in_scope(|| info!(brokers = ?config.brokers, "成功连接到Kafka"));

        Ok(Self {
            client,
            config,
            span,
        })
    }

    fn controller(&self) -> BusResult<ControllerClient> {
        self.client
            .controller_client()
            .map_err(|e| BusError::Broker(format!("获取controller失败: {e}")))
    }

    fn timeout_ms(&self) -> i32 {
        i32::try_from(self.config.operation_timeout.as_millis()).unwrap_or(i32::MAX)
    }
}

#[async_trait]
impl BrokerClient for KafkaBrokerClient {
    async fn ensure_topic(&self, topic: &str) -> BusResult<()> {
        let controller = self.controller()?;
        let result = controller
            .create_topic(
                topic,
                self.config.partitions,
                self.config.replication_factor,
                self.timeout_ms(),
            )
            .instrument(self.span.clone())
            .await;

        match result {
            Ok(()) => {
                self.span.in_scope(|| info!(topic, "创建topic"));
                Ok(())
            }
            Err(KafkaError::ServerError {
                protocol_error: ProtocolError::TopicAlreadyExists,
                ..
            }) => {
                self.span.in_scope(|| debug!(topic, "topic已存在"));
                Ok(())
            }
            Err(e) => Err(BusError::Broker(format!("创建topic {topic} 失败: {e}"))),
        }
    }

    async fn delete_topic(&self, topic: &str) -> BusResult<()> {
        let controller = self.controller()?;
        let result = controller
            .delete_topic(topic, self.timeout_ms())
            .instrument(self.span.clone())
            .await;

        match result {
            Ok(()) => {
                self.span.in_scope(|| info!(topic, "删除topic"));
                Ok(())
            }
            Err(KafkaError::ServerError {
                protocol_error: ProtocolError::UnknownTopicOrPartition,
                ..
            }) => {
                self.span.in_scope(|| debug!(topic, "topic不存在，无需删除"));
                Ok(())
            }
            Err(e) => Err(BusError::Broker(format!("删除topic {topic} 失败: {e}"))),
        }
    }

    async fn topic_exists(&self, topic: &str) -> BusResult<bool> {
        let topics = self
            .client
            .list_topics()
            .instrument(self.span.clone())
            .await
            .map_err(|e| BusError::Broker(format!("获取topic列表失败: {e}")))?;

        Ok(topics.iter().any(|t| t.name == topic))
    }
}
