use crate::{BusError, BusResult};

const BROKER_SEPARATOR: char = ',';

/// Broker endpoints the dispatcher talks to.
///
/// Always holds at least one address and never an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    brokers: Vec<String>,
}

impl ConnectionConfig {
    /// Split the comma separated `KAFKA_BROKERS` value, keeping input order.
    ///
    /// An absent or empty value and any blank element are configuration
    /// errors; a blank broker is never passed on to the runtime.
    pub fn parse(raw: Option<&str>) -> BusResult<Self> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                return Err(BusError::Configuration(
                    "environment variable KAFKA_BROKERS not set".to_string(),
                ))
            }
        };

        let brokers: Vec<String> = raw
            .split(BROKER_SEPARATOR)
            .map(|broker| broker.trim().to_string())
            .collect();

        if let Some(position) = brokers.iter().position(|broker| broker.is_empty()) {
            return Err(BusError::Configuration(format!(
                "KAFKA_BROKERS entry {position} is empty in {raw:?}"
            )));
        }

        Ok(Self { brokers })
    }

    pub fn brokers(&self) -> &[String] {
        &self.brokers
    }

    pub fn into_brokers(self) -> Vec<String> {
        self.brokers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let config = ConnectionConfig::parse(Some("a,b,c")).unwrap();
        assert_eq!(config.brokers(), ["a", "b", "c"]);
    }

    #[test]
    fn test_length_is_commas_plus_one() {
        for raw in ["b1:9092", "b1:9092,b2:9092", "x,y,z,w,v"] {
            let config = ConnectionConfig::parse(Some(raw)).unwrap();
            assert_eq!(config.brokers().len(), raw.matches(',').count() + 1);
        }
    }

    #[test]
    fn test_entries_are_trimmed() {
        let config = ConnectionConfig::parse(Some(" b1:9092 , b2:9092")).unwrap();
        assert_eq!(config.into_brokers(), vec!["b1:9092", "b2:9092"]);
    }

    #[test]
    fn test_missing_or_empty_is_configuration_error() {
        for raw in [None, Some(""), Some("   ")] {
            let err = ConnectionConfig::parse(raw).unwrap_err();
            assert!(matches!(err, BusError::Configuration(_)));
        }
    }

    #[test]
    fn test_blank_entry_is_rejected() {
        let err = ConnectionConfig::parse(Some("b1:9092,,b3:9092")).unwrap_err();
        assert!(err.to_string().contains("entry 1"));

        assert!(ConnectionConfig::parse(Some("b1:9092,")).is_err());
    }
}
