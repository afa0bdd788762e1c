use clap::{value_parser, Arg, ArgMatches, Command};

/// 命令行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub kubeconfig: String,
    pub master: String,
    pub threads_per_reconciler: usize,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            kubeconfig: String::new(),
            master: String::new(),
            threads_per_reconciler: 1,
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("kafka-dispatcher")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Kafka 总线 Dispatcher")
        .arg(
            Arg::new("kubeconfig")
                .long("kubeconfig")
                .value_name("PATH")
                .help("Path to a kubeconfig. Only required if out-of-cluster.")
                .default_value(""),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .value_name("URL")
                .help("The address of the Kubernetes API server. Overrides any value in kubeconfig. Only required if out-of-cluster.")
                .default_value(""),
        )
        .arg(
            Arg::new("threads-per-reconciler")
                .long("threads-per-reconciler")
                .value_name("N")
                .help("Number of reconciler workers")
                .value_parser(value_parser!(u16).range(1..))
                .default_value("1"),
        )
}

impl StartupConfig {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let text = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

        Self {
            kubeconfig: text("kubeconfig"),
            master: text("master"),
            threads_per_reconciler: matches
                .get_one::<u16>("threads-per-reconciler")
                .map(|n| usize::from(*n))
                .unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> StartupConfig {
        let matches = build_cli().try_get_matches_from(args.iter().copied()).unwrap();
        StartupConfig::from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&["kafka-dispatcher"]), StartupConfig::default());
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "kafka-dispatcher",
            "--kubeconfig",
            "/etc/kube/config",
            "--master",
            "https://10.0.0.1:6443",
            "--threads-per-reconciler",
            "4",
        ]);
        assert_eq!(config.kubeconfig, "/etc/kube/config");
        assert_eq!(config.master, "https://10.0.0.1:6443");
        assert_eq!(config.threads_per_reconciler, 4);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = build_cli().try_get_matches_from([
            "kafka-dispatcher",
            "--threads-per-reconciler",
            "0",
        ]);
        assert!(result.is_err());
    }
}
