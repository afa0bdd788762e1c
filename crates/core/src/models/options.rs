use std::path::PathBuf;

use tracing::Span;
use url::Url;

use crate::{BusError, BusResult};

/// What the runtime needs to reach the cluster control plane, plus the
/// shared logger handle.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Path to a kubeconfig. `None` means in-cluster configuration.
    pub kubeconfig: Option<PathBuf>,
    /// Overrides the API server address found in the kubeconfig.
    pub master_url: Option<String>,
    /// Span every component logs under.
    pub logger: Span,
}

impl RuntimeOptions {
    /// Empty flag values are treated as "not set".
    pub fn new(kubeconfig: &str, master_url: &str, logger: Span) -> Self {
        Self {
            kubeconfig: (!kubeconfig.is_empty()).then(|| PathBuf::from(kubeconfig)),
            master_url: (!master_url.is_empty()).then(|| master_url.to_string()),
            logger,
        }
    }

    pub fn in_cluster(&self) -> bool {
        self.kubeconfig.is_none() && self.master_url.is_none()
    }

    /// Checks the control-plane settings before any connection is attempted.
    pub fn validate(&self) -> BusResult<()> {
        if let Some(path) = &self.kubeconfig {
            if !path.is_file() {
                return Err(BusError::Construction(format!(
                    "kubeconfig not found: {}",
                    path.display()
                )));
            }
        }

        if let Some(master) = &self.master_url {
            let url = Url::parse(master).map_err(|e| {
                BusError::Construction(format!("invalid master URL {master:?}: {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(BusError::Construction(format!(
                    "master URL must use http or https: {master}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_flags_mean_in_cluster() {
        let options = RuntimeOptions::new("", "", Span::none());
        assert!(options.in_cluster());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_existing_kubeconfig_is_accepted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let options = RuntimeOptions::new(path, "https://10.0.0.1:6443", Span::none());
        assert!(!options.in_cluster());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_missing_kubeconfig_is_construction_error() {
        let options = RuntimeOptions::new("/nonexistent/kubeconfig", "", Span::none());
        let err = options.validate().unwrap_err();
        assert!(matches!(err, BusError::Construction(_)));
    }

    #[test]
    fn test_master_url_must_be_http() {
        assert!(RuntimeOptions::new("", "not a url", Span::none())
            .validate()
            .is_err());
        assert!(RuntimeOptions::new("", "ftp://master", Span::none())
            .validate()
            .is_err());
        assert!(RuntimeOptions::new("", "http://master:8080", Span::none())
            .validate()
            .is_ok());
    }
}
