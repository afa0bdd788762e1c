use std::future::Future;

use anyhow::{Context, Result};
use bus_core::{
    dispatcher_span, BusReference, BusResult, ConnectionConfig, LogConfig, OutputFormat,
    RuntimeOptions, StopSignal,
};
use bus_dispatcher::BusDispatcher;
use tracing::{error, info, Instrument};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::StartupConfig;

/// Keeps the log writer alive; dropping it flushes every buffered entry.
#[must_use = "dropping the guard flushes and closes the log writer"]
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// 初始化日志系统
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        OutputFormat::Json => {
            registry
                .with(fmt::layer().json().with_writer(writer))
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        OutputFormat::Pretty => {
            registry
                .with(fmt::layer().pretty().with_writer(writer))
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
    }

    Ok(LoggingGuard { _guard: guard })
}

/// 启动 Dispatcher 的通用流程
///
/// Resolves identity and brokers through `lookup`, builds the dispatcher
/// with `construct`, installs the stop signal with `install_stop` and runs
/// the workers until they have drained. Configuration and construction
/// errors are logged and returned; nothing here terminates the process.
pub async fn run_dispatcher<L, C, Fut, D, S>(
    lookup: L,
    startup: StartupConfig,
    construct: C,
    install_stop: S,
) -> Result<()>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(BusReference, ConnectionConfig, RuntimeOptions) -> Fut,
    Fut: Future<Output = BusResult<D>>,
    D: BusDispatcher,
    S: FnOnce() -> StopSignal,
{
    let bus_ref = BusReference::from_lookup(&lookup);
    let logger = dispatcher_span(&bus_ref);

    let brokers = lookup("KAFKA_BROKERS");
    bootstrap(bus_ref, brokers, startup, logger.clone(), construct, install_stop)
        .instrument(logger)
        .await
}

async fn bootstrap<C, Fut, D, S>(
    bus_ref: BusReference,
    brokers: Option<String>,
    startup: StartupConfig,
    logger: tracing::Span,
    construct: C,
    install_stop: S,
) -> Result<()>
where
    C: FnOnce(BusReference, ConnectionConfig, RuntimeOptions) -> Fut,
    Fut: Future<Output = BusResult<D>>,
    D: BusDispatcher,
    S: FnOnce() -> StopSignal,
{
    info!("启动 Kafka 总线 Dispatcher");

    let connection = match ConnectionConfig::parse(brokers.as_deref()) {
        Ok(connection) => connection,
        Err(e) => {
            error!(error = %e, "Kafka broker 配置无效");
            return Err(e.into());
        }
    };
    info!(brokers = ?connection.brokers(), "Kafka broker 配置已加载");

    let options = RuntimeOptions::new(&startup.kubeconfig, &startup.master, logger);

    let dispatcher = match construct(bus_ref, connection, options).await {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!(error = %e, "启动 Kafka 总线 Dispatcher 失败");
            return Err(anyhow::Error::new(e).context("启动 Kafka 总线 Dispatcher 失败"));
        }
    };

    // 先构建 Dispatcher，再安装信号处理器
    let stop = install_stop();

    dispatcher.run(startup.threads_per_reconciler, stop).await;

    info!("Kafka 总线 Dispatcher 已退出");
    Ok(())
}
