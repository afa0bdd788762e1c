use std::sync::Arc;

use bus_core::{StopSignal, StopTrigger};
use tracing::{debug, error, info, warn};

/// 优雅关闭管理器
///
/// Sole writer of the process-wide [`StopSignal`]. Clones share the same
/// underlying signal.
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    /// 关闭信号发送端
    trigger: Arc<StopTrigger>,
    /// 关闭信号接收端，供订阅者克隆
    signal: StopSignal,
    /// 强制退出信号发送端
    force_trigger: Arc<StopTrigger>,
    /// 强制退出信号接收端
    force_signal: StopSignal,
}

impl ShutdownManager {
    /// 创建新的关闭管理器
    pub fn new() -> Self {
        let (trigger, signal) = StopSignal::pair();
        let (force_trigger, force_signal) = StopSignal::pair();
        Self {
            trigger,
            signal,
            force_trigger,
            force_signal,
        }
    }

    /// 订阅关闭信号
    ///
    /// 在关闭之后订阅也会立即观察到信号
    pub fn subscribe(&self) -> StopSignal {
        self.signal.clone()
    }

    /// 订阅强制退出信号
    ///
    /// Fires on a second termination signal. The holder is expected to
    /// abandon the drain and return an error so the log guard still flushes.
    pub fn forced(&self) -> StopSignal {
        self.force_signal.clone()
    }

    /// 触发关闭
    pub fn shutdown(&self) {
        if !self.trigger.fire() {
            debug!("关闭管理器已经触发过关闭");
            return;
        }
        info!("关闭信号已发送");
    }

    /// 检查是否已经关闭
    pub fn is_shutdown(&self) -> bool {
        self.trigger.is_fired()
    }

    /// 安装进程信号处理器
    ///
    /// 第一次收到 SIGINT/SIGTERM 时触发优雅关闭；关闭完成前再次收到信号则触发强制退出。
    /// The listeners are registered before this returns.
    pub fn install_signal_handler(&self) -> StopSignal {
        let mut signals = TerminationSignals::install();
        if !signals.is_listening() {
            error!("没有可用的信号处理器，进程只能被强制终止");
            return self.subscribe();
        }

        let manager = self.clone();
        tokio::spawn(async move {
            let first = signals.recv().await;
            info!(signal = first, "收到关闭信号，开始优雅关闭...");
            manager.shutdown();

            let second = signals.recv().await;
            warn!(signal = second, "再次收到关闭信号，强制退出");
            manager.force_trigger.fire();
        });

        self.subscribe()
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 终止信号监听
///
/// A listener that fails to install is logged and skipped.
struct TerminationSignals {
    #[cfg(unix)]
    interrupt: Option<tokio::signal::unix::Signal>,
    #[cfg(unix)]
    terminate: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl TerminationSignals {
    fn install() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let listen = |kind: SignalKind, name: &str| match signal(kind) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("安装{name}信号处理器失败: {e}");
                None
            }
        };

        Self {
            interrupt: listen(SignalKind::interrupt(), "SIGINT"),
            terminate: listen(SignalKind::terminate(), "SIGTERM"),
        }
    }

    fn is_listening(&self) -> bool {
        self.interrupt.is_some() || self.terminate.is_some()
    }

    async fn recv(&mut self) -> &'static str {
        async fn next(stream: &mut Option<tokio::signal::unix::Signal>) {
            match stream {
                Some(stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        }

        tokio::select! {
            _ = next(&mut self.interrupt) => "SIGINT",
            _ = next(&mut self.terminate) => "SIGTERM",
        }
    }
}

#[cfg(not(unix))]
impl TerminationSignals {
    fn install() -> Self {
        Self {}
    }

    fn is_listening(&self) -> bool {
        true
    }

    async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("安装Ctrl+C信号处理器失败: {e}");
            std::future::pending::<()>().await;
        }
        "CTRL_C"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_shutdown_manager_basic() {
        let manager = ShutdownManager::new();

        // 初始状态应该是未关闭
        assert!(!manager.is_shutdown());

        let rx = manager.subscribe();
        manager.shutdown();

        // 应该能收到关闭信号
        let result = timeout(Duration::from_millis(100), rx.stopped()).await;
        assert!(result.is_ok());
        assert!(manager.is_shutdown());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let manager = ShutdownManager::new();

        let rx1 = manager.subscribe();
        let rx2 = manager.subscribe();
        let rx3 = manager.subscribe();

        manager.shutdown();

        // 所有订阅者都应该收到信号
        assert!(timeout(Duration::from_millis(100), rx1.stopped()).await.is_ok());
        assert!(timeout(Duration::from_millis(100), rx2.stopped()).await.is_ok());
        assert!(timeout(Duration::from_millis(100), rx3.stopped()).await.is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_after_shutdown() {
        let manager = ShutdownManager::new();
        manager.shutdown();

        // 关闭之后订阅，应该立即收到信号
        let rx = manager.subscribe();
        assert!(rx.is_stopped());
        assert!(timeout(Duration::from_millis(100), rx.stopped()).await.is_ok());
    }

    #[tokio::test]
    async fn test_double_shutdown() {
        let manager = ShutdownManager::new();

        manager.shutdown();
        assert!(manager.is_shutdown());

        // 第二次关闭应该是无操作
        manager.shutdown();
        assert!(manager.is_shutdown());
    }

    #[tokio::test]
    async fn test_manual_shutdown_does_not_force() {
        let manager = ShutdownManager::new();
        let stop = manager.subscribe();

        manager.shutdown();
        manager.shutdown();

        assert!(stop.is_stopped());
        assert!(!manager.forced().is_stopped());
    }

    #[cfg(unix)]
    fn send_sigterm_to_self() {
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("kill runs");
        assert!(status.success());
    }

    // Only test that installs listeners: a signal sent here would reach
    // every installed handler in this process.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_termination_signals_stop_then_force() {
        let manager = ShutdownManager::new();
        let stop = manager.install_signal_handler();
        let forced = manager.forced();

        assert!(timeout(Duration::from_millis(20), stop.stopped()).await.is_err());
        assert!(!manager.is_shutdown());

        // first signal fires the stop signal only
        send_sigterm_to_self();
        assert!(timeout(Duration::from_secs(2), stop.stopped()).await.is_ok());
        assert!(manager.is_shutdown());
        assert!(!forced.is_stopped());

        // second signal escalates to a forced exit
        send_sigterm_to_self();
        assert!(timeout(Duration::from_secs(2), forced.stopped()).await.is_ok());
    }
}
