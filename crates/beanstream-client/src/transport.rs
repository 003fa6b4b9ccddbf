//! # Transport Adapter
//!
//! The boundary between the client and the network: one operation that
//! takes a request document and an operation name and returns the response
//! document. [`HttpSoapTransport`] is the production implementation;
//! callers with their own HTTP stack (or tests) implement
//! [`SoapTransport`] directly.
//!
//! ## Timeout & Retry
//!
//! The HTTP transport applies a per-request timeout (default 30s). It never
//! retries: a payment request that timed out may still have been processed,
//! so the decision belongs to the caller.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use url::Url;

use crate::config::BeanstreamConfig;
use crate::error::TransportError;
use crate::soap;

/// Longest response body excerpt carried in [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// A remote procedure call carrying XML documents.
///
/// Implementations must be `Send + Sync` so a client can be shared across
/// tasks behind an `Arc`.
pub trait SoapTransport: Send + Sync {
    /// Invoke `operation` with `request_xml` and return the response document.
    fn call(
        &self,
        operation: &str,
        request_xml: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// SOAP 1.1 over HTTP(S) via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSoapTransport {
    client: reqwest::Client,
    endpoint: Url,
    namespace: String,
    timeout_secs: u64,
}

impl HttpSoapTransport {
    /// Build a transport for the endpoint and namespace in `config`.
    pub fn new(config: &BeanstreamConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml; charset=utf-8"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            namespace: config.soap_namespace.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn send_error(&self, operation: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                operation: operation.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            TransportError::Http {
                operation: operation.to_string(),
                source: e,
            }
        }
    }
}

impl SoapTransport for HttpSoapTransport {
    async fn call(&self, operation: &str, request_xml: &str) -> Result<String, TransportError> {
        let envelope = soap::encode_envelope(&self.namespace, operation, request_xml);

        tracing::debug!(
            operation,
            endpoint = %self.endpoint,
            bytes = envelope.len(),
            "sending SOAP request"
        );

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("SOAPAction", soap::soap_action(&self.namespace, operation))
            .body(envelope)
            .send()
            .await
            .map_err(|e| self.send_error(operation, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| self.send_error(operation, e))?;

        if !status.is_success() {
            // SOAP 1.1 reports faults with HTTP 500.
            if let Err(fault @ TransportError::Fault { .. }) =
                soap::decode_envelope(operation, &body)
            {
                tracing::warn!(operation, status = status.as_u16(), "SOAP fault: {fault}");
                return Err(fault);
            }
            return Err(TransportError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        soap::decode_envelope(operation, &body)
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_bodies_on_char_boundaries() {
        assert_eq!(excerpt("short"), "short");
        let long = "é".repeat(MAX_ERROR_BODY + 10);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn transport_keeps_configured_endpoint() {
        let config = BeanstreamConfig::new(
            "https://gateway.example/soap".parse().unwrap(),
            "user",
            "pass",
            "300200000",
        );
        let transport = HttpSoapTransport::new(&config).unwrap();
        assert_eq!(transport.endpoint().as_str(), "https://gateway.example/soap");
    }
}
