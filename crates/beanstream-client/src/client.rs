//! # BeanClient
//!
//! One method per transaction type. Each builds the request with the
//! client's fixed auth fields, makes exactly one `TransactionProcess` call
//! and classifies the answer. Declines, user errors and system errors come
//! back as [`Outcome`] variants; only transport failures and unreadable
//! responses are `Err`.

use beanstream_core::{
    interpret, AdjustmentDetails, AuthFields, Outcome, PaymentDetails, TransactionRequest,
};

use crate::config::BeanstreamConfig;
use crate::error::BeanstreamError;
use crate::transport::{HttpSoapTransport, SoapTransport};

/// The only remote operation the gateway exposes.
pub const TRANSACTION_PROCESS: &str = "TransactionProcess";

/// Client for one merchant account.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct BeanClient<T = HttpSoapTransport> {
    auth: AuthFields,
    transport: T,
}

impl BeanClient<HttpSoapTransport> {
    /// Client over HTTP using `config`.
    pub fn new(config: BeanstreamConfig) -> Result<Self, BeanstreamError> {
        let transport = HttpSoapTransport::new(&config)?;
        Ok(Self::with_transport(config.auth_fields(), transport))
    }

    /// Client configured from `BEANSTREAM_*` environment variables.
    pub fn from_env() -> Result<Self, BeanstreamError> {
        Self::new(BeanstreamConfig::from_env()?)
    }
}

impl<T: SoapTransport> BeanClient<T> {
    pub fn with_transport(auth: AuthFields, transport: T) -> Self {
        Self { auth, transport }
    }

    pub fn auth(&self) -> &AuthFields {
        &self.auth
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Authorize and capture a card payment.
    pub async fn purchase(&self, payment: &PaymentDetails) -> Result<Outcome, BeanstreamError> {
        self.process(TransactionRequest::purchase(&self.auth, payment))
            .await
    }

    /// Authorize a card payment without capturing it.
    pub async fn preauth(&self, payment: &PaymentDetails) -> Result<Outcome, BeanstreamError> {
        self.process(TransactionRequest::preauth(&self.auth, payment))
            .await
    }

    /// Capture a pre-authorization. `adj_id` is the pre-auth's `trnId`.
    pub async fn complete(
        &self,
        adjustment: &AdjustmentDetails,
    ) -> Result<Outcome, BeanstreamError> {
        self.process(TransactionRequest::completion(&self.auth, adjustment))
            .await
    }

    /// Return funds from an earlier purchase or completion.
    pub async fn refund(
        &self,
        adjustment: &AdjustmentDetails,
    ) -> Result<Outcome, BeanstreamError> {
        self.process(TransactionRequest::refund(&self.auth, adjustment))
            .await
    }

    /// Void an unsettled purchase.
    pub async fn void(
        &self,
        adjustment: &AdjustmentDetails,
    ) -> Result<Outcome, BeanstreamError> {
        self.process(TransactionRequest::void(&self.auth, adjustment))
            .await
    }

    /// Send a prepared request and classify the response.
    pub async fn process(&self, request: TransactionRequest) -> Result<Outcome, BeanstreamError> {
        let trn_type = request.get(beanstream_core::fields::TRN_TYPE).unwrap_or("?");
        let order_number = request.order_number().unwrap_or("");

        tracing::info!(trn_type, order_number, "submitting transaction");

        let body = self
            .transport
            .call(TRANSACTION_PROCESS, &request.to_xml())
            .await?;

        let outcome = interpret(&body).map_err(|e| {
            tracing::warn!(trn_type, order_number, "unusable gateway response: {e}");
            e
        })?;

        tracing::info!(
            trn_type,
            order_number,
            outcome = %outcome.kind(),
            trn_id = outcome
                .response()
                .and_then(|r| r.transaction_id())
                .unwrap_or(""),
            "transaction processed"
        );

        Ok(outcome)
    }
}
