//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::ledger::ethereum;
use smart_default::SmartDefault;
use url::Url;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Ledger configuration.
    pub ledger: Ledger,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Ledger configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Ledger {
    /// JSON-RPC endpoint to read the contract and to submit locally signed
    /// transactions through.
    #[default("https://rpc.ankr.com/eth_goerli".to_owned())]
    pub rpc_url: String,

    /// JSON-RPC endpoint of an external signer (a wallet exposing
    /// `eth_requestAccounts` and `eth_sendTransaction`), if any.
    pub external_signer_url: Option<String>,

    /// Interval between polls of a submitted transaction receipt.
    #[default(time::Duration::from_secs(2))]
    #[serde(with = "humantime_serde")]
    pub confirmation_poll_interval: time::Duration,
}

impl TryFrom<Ledger> for ethereum::Config {
    type Error = url::ParseError;

    fn try_from(value: Ledger) -> Result<Self, Self::Error> {
        let Ledger {
            rpc_url,
            external_signer_url,
            confirmation_poll_interval,
        } = value;

        Ok(Self {
            rpc_url: Url::parse(&rpc_url)?,
            external_signer_url: external_signer_url
                .as_deref()
                .map(Url::parse)
                .transpose()?,
            confirmation_poll_interval,
        })
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use service::infra::ledger::ethereum;

    use super::{Config, Ledger};

    #[test]
    fn defaults_to_goerli() {
        let config = Config::new("non-existent.toml").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors.origins, ["*"]);
        assert_eq!(
            config.ledger.confirmation_poll_interval,
            Duration::from_secs(2),
        );

        let ledger = ethereum::Config::try_from(config.ledger).unwrap();
        assert_eq!(ledger.rpc_url.host_str(), Some("rpc.ankr.com"));
        assert!(ledger.external_signer_url.is_none());
    }

    #[test]
    fn rejects_malformed_urls() {
        let ledger = Ledger {
            external_signer_url: Some("not a url".to_owned()),
            ..Ledger::default()
        };

        assert!(ethereum::Config::try_from(ledger).is_err());
    }
}
