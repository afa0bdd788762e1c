use std::sync::Arc;

use async_trait::async_trait;
use bus_core::{
    traits::{BrokerClient, Reconciler},
    BusReference, BusResult, ConnectionConfig, RuntimeOptions, StopSignal,
};
use bus_infrastructure::{KafkaBrokerClient, KafkaBrokerConfig};
use futures::future::join_all;
use tracing::{error, info, warn, Instrument};

use crate::{reconciler::BusReconciler, work_queue::WorkQueue, worker::run_worker};

/// Blocking entry point of a constructed dispatcher.
#[async_trait]
pub trait BusDispatcher: Send + Sync {
    /// Run `threads` workers until `stop` fires and every worker has drained.
    async fn run(&self, threads: usize, stop: StopSignal);
}

/// Kafka 总线 Dispatcher
pub struct KafkaBusDispatcher {
    bus_ref: BusReference,
    options: RuntimeOptions,
    reconciler: Arc<dyn Reconciler>,
    queue: WorkQueue,
}

impl KafkaBusDispatcher {
    /// Build a dispatcher connected to the given brokers.
    ///
    /// Fails with [`BusError::Construction`](bus_core::BusError::Construction)
    /// when the control-plane options are invalid or the Kafka client cannot
    /// be initialised.
    pub async fn new(
        bus_ref: BusReference,
        connection: ConnectionConfig,
        options: RuntimeOptions,
    ) -> BusResult<Self> {
        options.validate()?;

        let config = KafkaBrokerConfig::new(connection.into_brokers());
        let broker = KafkaBrokerClient::connect(config, &options.logger).await?;

        Self::with_broker(bus_ref, options, Arc::new(broker))
    }

    /// Build a dispatcher that reconciles topics on an already connected broker.
    pub fn with_broker(
        bus_ref: BusReference,
        options: RuntimeOptions,
        broker: Arc<dyn BrokerClient>,
    ) -> BusResult<Self> {
        Self::with_reconciler(bus_ref, options, Arc::new(BusReconciler::new(broker)))
    }

    /// Build a dispatcher around a custom reconciler.
    pub fn with_reconciler(
        bus_ref: BusReference,
        options: RuntimeOptions,
        reconciler: Arc<dyn Reconciler>,
    ) -> BusResult<Self> {
        options.validate()?;

        options.logger.in_scope(|| {
            info!(
                in_cluster = options.in_cluster(),
                kubeconfig = ?options.kubeconfig,
                master = ?options.master_url,
                "dispatcher constructed"
            )
        });

        Ok(Self {
            bus_ref,
            options,
            reconciler,
            queue: WorkQueue::new(),
        })
    }

    pub fn bus_ref(&self) -> &BusReference {
        &self.bus_ref
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Handle through which the resource watch submits changes.
    pub fn work_queue(&self) -> WorkQueue {
        self.queue.clone()
    }
}

#[async_trait]
impl BusDispatcher for KafkaBusDispatcher {
    async fn run(&self, threads: usize, stop: StopSignal) {
        let logger = self.options.logger.clone();

        let threads = if threads == 0 {
            logger.in_scope(|| warn!("worker count 0 requested, running 1 worker"));
            1
        } else {
            threads
        };

        logger.in_scope(|| info!(threads, "starting workers"));

        let handles: Vec<_> = (0..threads)
            .map(|id| {
                let worker = run_worker(
                    id,
                    self.queue.clone(),
                    Arc::clone(&self.reconciler),
                    stop.clone(),
                );
                tokio::spawn(worker.instrument(logger.clone()))
            })
            .collect();

        for (id, result) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = result {
                logger.in_scope(|| error!(worker = id, error = %e, "worker terminated abnormally"));
            }
        }

        logger.in_scope(|| {
            info!(
                undelivered = self.queue.len(),
                in_flight = self.queue.in_flight(),
                "all workers stopped"
            )
        });
    }
}
