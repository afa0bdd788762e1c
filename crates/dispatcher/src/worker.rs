use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bus_core::{traits::Reconciler, StopSignal};
use futures::FutureExt;
use metrics::counter;
use tracing::{debug, error, info};

use crate::work_queue::WorkQueue;

/// One reconciliation worker.
///
/// Stop is only observed between items: an item that has been taken from
/// the queue is always finished, and no item is taken once stop has fired.
/// A panicking reconcile counts as a failed item and the worker keeps going.
pub(crate) async fn run_worker(
    id: usize,
    queue: WorkQueue,
    reconciler: Arc<dyn Reconciler>,
    stop: StopSignal,
) {
    info!(worker = id, "worker started");

    loop {
        let item = tokio::select! {
            biased;
            _ = stop.stopped() => break,
            item = queue.next() => item,
        };

        debug!(worker = id, resource = %item.key, change = ?item.change, "reconciling");
        match AssertUnwindSafe(reconciler.reconcile(&item))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {
                counter!("bus_dispatcher_items_processed_total").increment(1);
            }
            Ok(Err(e)) => {
                counter!("bus_dispatcher_items_failed_total").increment(1);
                error!(worker = id, resource = %item.key, error = %e, "reconcile failed");
            }
            Err(panic) => {
                counter!("bus_dispatcher_items_failed_total").increment(1);
                error!(
                    worker = id,
                    resource = %item.key,
                    panic = panic_message(panic.as_ref()),
                    "reconcile panicked"
                );
            }
        }
        queue.done(&item.key);
    }

    info!(worker = id, "worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
