//! # Client Configuration
//!
//! Endpoint, merchant credentials and HTTP settings. Built directly with
//! [`BeanstreamConfig::new`] or from `BEANSTREAM_*` environment variables
//! with [`BeanstreamConfig::from_env`].

use std::fmt;

use beanstream_core::request::DEFAULT_SERVICE_VERSION;
use beanstream_core::AuthFields;
use url::Url;
use zeroize::Zeroizing;

/// Namespace of the `TransactionProcess` SOAP operation.
pub const DEFAULT_SOAP_NAMESPACE: &str = "http://www.beanstream.com/soap/";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ENDPOINT: &str = "BEANSTREAM_ENDPOINT";
pub const ENV_USERNAME: &str = "BEANSTREAM_USERNAME";
pub const ENV_PASSWORD: &str = "BEANSTREAM_PASSWORD";
pub const ENV_MERCHANT_ID: &str = "BEANSTREAM_MERCHANT_ID";
pub const ENV_SERVICE_VERSION: &str = "BEANSTREAM_SERVICE_VERSION";
pub const ENV_SOAP_NAMESPACE: &str = "BEANSTREAM_SOAP_NAMESPACE";
pub const ENV_TIMEOUT_SECS: &str = "BEANSTREAM_TIMEOUT_SECS";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Everything needed to reach the gateway as one merchant.
#[derive(Clone)]
pub struct BeanstreamConfig {
    /// SOAP endpoint the envelope is POSTed to.
    pub endpoint: Url,
    pub username: String,
    pub password: Zeroizing<String>,
    pub merchant_id: String,
    pub service_version: String,
    pub soap_namespace: String,
    pub timeout_secs: u64,
}

impl BeanstreamConfig {
    /// Configuration with the default service version, namespace and timeout.
    pub fn new(
        endpoint: Url,
        username: impl Into<String>,
        password: impl Into<String>,
        merchant_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            username: username.into(),
            password: Zeroizing::new(password.into()),
            merchant_id: merchant_id.into(),
            service_version: DEFAULT_SERVICE_VERSION.to_string(),
            soap_namespace: DEFAULT_SOAP_NAMESPACE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the configuration from `BEANSTREAM_*` environment variables.
    ///
    /// `BEANSTREAM_ENDPOINT`, `BEANSTREAM_USERNAME`, `BEANSTREAM_PASSWORD` and
    /// `BEANSTREAM_MERCHANT_ID` are required; the service version, SOAP
    /// namespace and timeout fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let optional = |var: &str| lookup(var).filter(|v| !v.is_empty());

        let endpoint = required(ENV_ENDPOINT)?;
        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
            var: ENV_ENDPOINT,
            reason: e.to_string(),
        })?;

        let mut config = Self::new(
            endpoint,
            required(ENV_USERNAME)?,
            required(ENV_PASSWORD)?,
            required(ENV_MERCHANT_ID)?,
        );

        if let Some(version) = optional(ENV_SERVICE_VERSION) {
            config.service_version = version;
        }
        if let Some(ns) = optional(ENV_SOAP_NAMESPACE) {
            config.soap_namespace = ns;
        }
        if let Some(secs) = optional(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs.parse().map_err(|e| ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                reason: format!("{secs:?}: {e}"),
            })?;
        }
        Ok(config)
    }

    /// The authentication fields merged into every request.
    pub fn auth_fields(&self) -> AuthFields {
        AuthFields::new(
            self.username.clone(),
            self.password.as_str(),
            self.merchant_id.clone(),
        )
        .with_service_version(self.service_version.clone())
    }
}

impl fmt::Debug for BeanstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanstreamConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("merchant_id", &self.merchant_id)
            .field("service_version", &self.service_version)
            .field("soap_namespace", &self.soap_namespace)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
