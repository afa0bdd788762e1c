//! One-shot, broadcast-style cancellation.
//!
//! A [`StopTrigger`] is the single writer; any number of cloned
//! [`StopSignal`]s observe it. The signal fires at most once and is never
//! reset, and a signal cloned after firing still reports stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// Read-only side of the stop channel.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

/// Write side of the stop channel.
#[derive(Debug)]
pub struct StopTrigger {
    tx: watch::Sender<bool>,
    fired: AtomicBool,
}

impl StopSignal {
    /// Create a connected trigger and signal.
    pub fn pair() -> (Arc<StopTrigger>, StopSignal) {
        let (tx, rx) = watch::channel(false);
        let trigger = StopTrigger {
            tx,
            fired: AtomicBool::new(false),
        };
        (Arc::new(trigger), StopSignal { rx })
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the trigger has fired.
    ///
    /// If the trigger is dropped without firing this never resolves.
    pub async fn stopped(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl StopTrigger {
    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.tx.send_replace(true);
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_fire_once() {
        let (trigger, signal) = StopSignal::pair();
        assert!(!signal.is_stopped());

        assert!(trigger.fire());
        assert!(!trigger.fire());
        assert!(trigger.is_fired());

        assert!(signal.is_stopped());
        assert!(timeout(Duration::from_millis(100), signal.stopped())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_all_clones_observe_stop() {
        let (trigger, signal) = StopSignal::pair();
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.stopped().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.fire();

        for waiter in waiters {
            assert!(timeout(Duration::from_millis(100), waiter).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_clone_after_fire() {
        let (trigger, signal) = StopSignal::pair();
        trigger.fire();

        let late = signal.clone();
        assert!(late.is_stopped());
        assert!(timeout(Duration::from_millis(100), late.stopped()).await.is_ok());
    }

    #[tokio::test]
    async fn test_not_fired_stays_pending() {
        let (_trigger, signal) = StopSignal::pair();
        assert!(timeout(Duration::from_millis(20), signal.stopped())
            .await
            .is_err());
    }
}
