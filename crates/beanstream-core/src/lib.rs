//! # beanstream-core: Transaction Mapping and Response Classification
//!
//! The I/O-free half of the Beanstream client. It knows how to build the
//! field set for each transaction type and how to read what the gateway
//! sends back; it never talks to the network.
//!
//! ## Pipeline
//!
//! ```text
//! PaymentDetails / AdjustmentDetails
//!     └─ request::TransactionRequest::{purchase, preauth, completion, refund, void}
//!          └─ to_xml()  ──►  transport (beanstream-client)
//!                               └─ response body
//!                                    └─ response::parse_response
//!                                         └─ response::normalize
//!                                              └─ outcome::classify  ──►  Outcome
//! ```
//!
//! ## Crate Policy
//!
//! - No network or filesystem access.
//! - No `.unwrap()` outside tests.
//! - Card numbers, CVDs and passwords never appear in `Debug` output.

pub mod error;
pub mod fields;
pub mod outcome;
pub mod request;
pub mod response;
pub mod transaction;
pub mod verification;

pub use error::{ResponseError, TransactionTypeError};
pub use outcome::{
    classify, interpret, Outcome, OutcomeError, OutcomeKind, TransactionResponse,
};
pub use request::{AdjustmentDetails, AuthFields, PaymentDetails, TransactionRequest};
pub use response::{normalize, parse_response, FieldValue, NormalizedResponse, RawResponse};
pub use transaction::TransactionType;
pub use verification::{AvsResult, CvdResult};
