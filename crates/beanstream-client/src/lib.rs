//! # beanstream-client: Typed Client for the Beanstream SOAP API
//!
//! Sends purchase, pre-authorization, completion, refund and void
//! transactions to the gateway's `TransactionProcess` SOAP operation and
//! returns a typed [`Outcome`].
//!
//! ```no_run
//! use beanstream_client::{BeanClient, BeanstreamConfig, Outcome, PaymentDetails};
//!
//! # async fn run() -> Result<(), beanstream_client::BeanstreamError> {
//! let config = BeanstreamConfig::new(
//!     "https://gateway.example/soap/ProcessTransaction.asp".parse().unwrap(),
//!     "MY_USERNAME",
//!     "MY_PASSWORD",
//!     "MY_MERCHANT_ID",
//! );
//! let client = BeanClient::new(config)?;
//!
//! let payment = PaymentDetails {
//!     card_owner: "John Doe".into(),
//!     card_number: "371100001000131".into(),
//!     amount: "10.00".into(),
//!     order_number: "123456789".into(),
//!     ..Default::default()
//! };
//! match client.purchase(&payment).await? {
//!     Outcome::Approved { response } => println!("approved: {:?}", response.transaction_id()),
//!     Outcome::Declined { response } => println!("declined: {:?}", response.message_text()),
//!     Outcome::UserError { fields, messages } => println!("fix {fields:?}: {messages:?}"),
//!     Outcome::SystemError { .. } => println!("gateway error"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`config`]: endpoint, credentials, timeout; `BEANSTREAM_*` env loading.
//! - [`soap`]: SOAP 1.1 envelope encoding and result extraction.
//! - [`transport`]: the [`SoapTransport`] boundary and its `reqwest` implementation.
//! - [`client`]: [`BeanClient`], one call per transaction.
//!
//! Field mapping and response classification live in [`beanstream_core`]
//! and are re-exported here.

pub mod client;
pub mod config;
pub mod error;
pub mod soap;
pub mod transport;

pub use client::{BeanClient, TRANSACTION_PROCESS};
pub use config::{BeanstreamConfig, ConfigError};
pub use error::{BeanstreamError, TransportError};
pub use transport::{HttpSoapTransport, SoapTransport};

pub use beanstream_core::{
    AdjustmentDetails, AuthFields, AvsResult, CvdResult, FieldValue, NormalizedResponse, Outcome,
    OutcomeError, OutcomeKind, PaymentDetails, ResponseError, TransactionRequest, TransactionType,
};
