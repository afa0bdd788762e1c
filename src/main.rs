use anyhow::{anyhow, Result};
use bus_core::LogConfig;
use bus_dispatcher::KafkaBusDispatcher;
use kafka_bus::cli::{build_cli, StartupConfig};
use kafka_bus::common::{init_logging, run_dispatcher};
use kafka_bus::shutdown::ShutdownManager;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = build_cli().get_matches();
    let startup = StartupConfig::from_matches(&matches);

    // 初始化日志系统，guard 离开作用域时刷新日志
    let _logging = init_logging(&LogConfig::from_env())?;

    let shutdown_manager = ShutdownManager::new();
    let forced = shutdown_manager.forced();

    let dispatcher = run_dispatcher(
        |key| std::env::var(key).ok(),
        startup,
        KafkaBusDispatcher::new,
        || shutdown_manager.install_signal_handler(),
    );

    // 强制退出时放弃排空，但仍经由返回路径刷新日志
    tokio::select! {
        result = dispatcher => result,
        _ = forced.stopped() => Err(anyhow!("再次收到关闭信号，强制退出")),
    }
}
