//! # Outcome Classifier
//!
//! Turns a normalized response into one of four outcomes using the
//! `errorType` discriminator:
//!
//! | `errorType` | Outcome |
//! |-------------|---------|
//! | `N` | [`Outcome::Approved`] or [`Outcome::Declined`], by `trnApproved` |
//! | `U` | [`Outcome::UserError`], from `errorFields` / `messageText` |
//! | `S` | [`Outcome::SystemError`] |
//! | other / absent | [`ResponseError::UnrecognizedOutcome`] |
//!
//! A decline is an ordinary outcome. Classification is stateless: one
//! response in, one outcome out.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ResponseError;
use crate::fields;
use crate::response::{normalize, parse_response, NormalizedResponse};

/// Separator for the `errorFields` and `messageText` lists. The gateway
/// defines no escaping; a comma inside a message splits it.
pub const LIST_SEPARATOR: char = ',';

/// Result of one `TransactionProcess` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The transaction was approved.
    Approved { response: NormalizedResponse },
    /// The issuer or gateway declined the transaction.
    Declined { response: NormalizedResponse },
    /// The request had caller-correctable problems. `fields[i]` is the field
    /// `messages[i]` is about.
    UserError {
        fields: Vec<String>,
        messages: Vec<String>,
    },
    /// The gateway failed to process the request.
    SystemError { response: NormalizedResponse },
}

/// Which [`Outcome`] variant a response produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Approved,
    Declined,
    UserError,
    SystemError,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Declined => write!(f, "declined"),
            Self::UserError => write!(f, "user error"),
            Self::SystemError => write!(f, "system error"),
        }
    }
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Approved { .. } => OutcomeKind::Approved,
            Self::Declined { .. } => OutcomeKind::Declined,
            Self::UserError { .. } => OutcomeKind::UserError,
            Self::SystemError { .. } => OutcomeKind::SystemError,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }

    /// The response data, for every outcome except a user error.
    pub fn response(&self) -> Option<&NormalizedResponse> {
        match self {
            Self::Approved { response }
            | Self::Declined { response }
            | Self::SystemError { response } => Some(response),
            Self::UserError { .. } => None,
        }
    }

    /// `(field, message)` pairs of a user error. Unpaired trailing entries
    /// are dropped.
    pub fn field_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        let (fields, messages): (&[String], &[String]) = match self {
            Self::UserError { fields, messages } => (fields, messages),
            _ => (&[], &[]),
        };
        fields
            .iter()
            .zip(messages)
            .map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Approved and declined responses are `Ok`; user and system errors
    /// become an [`OutcomeError`].
    pub fn into_result(self) -> Result<TransactionResponse, OutcomeError> {
        match self {
            Self::Approved { response } => Ok(TransactionResponse {
                approved: true,
                response,
            }),
            Self::Declined { response } => Ok(TransactionResponse {
                approved: false,
                response,
            }),
            Self::UserError { fields, messages } => {
                Err(OutcomeError::UserError { fields, messages })
            }
            Self::SystemError { response } => Err(OutcomeError::SystemError {
                response: Box::new(response),
            }),
        }
    }
}

/// A processed (approved or declined) transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub approved: bool,
    pub response: NormalizedResponse,
}

/// User and system errors, for callers that propagate them with `?`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("field error with request: {}", .fields.join(","))]
    UserError {
        fields: Vec<String>,
        messages: Vec<String>,
    },
    #[error("gateway system error: {}", .response.message_text().unwrap_or("no message"))]
    SystemError { response: Box<NormalizedResponse> },
}

/// Classify a normalized response.
pub fn classify(response: NormalizedResponse) -> Result<Outcome, ResponseError> {
    match response.error_type() {
        Some("U") => Ok(Outcome::UserError {
            fields: split_list(response.text(fields::ERROR_FIELDS)),
            messages: split_list(response.text(fields::MESSAGE_TEXT)),
        }),
        Some("S") => Ok(Outcome::SystemError { response }),
        Some("N") => match response.approved() {
            Some(true) => Ok(Outcome::Approved { response }),
            Some(false) => Ok(Outcome::Declined { response }),
            None => Err(ResponseError::malformed(
                "normal response without a trnApproved flag",
            )),
        },
        other => Err(ResponseError::UnrecognizedOutcome {
            code: other.map(str::to_string),
            response: Box::new(response),
        }),
    }
}

/// Parse, normalize and classify a response document.
pub fn interpret(body: &str) -> Result<Outcome, ResponseError> {
    classify(normalize(parse_response(body)?)?)
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(LIST_SEPARATOR).map(str::to_string).collect())
        .unwrap_or_default()
}
