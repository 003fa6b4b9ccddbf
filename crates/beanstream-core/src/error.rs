//! # Error Types
//!
//! Errors raised while interpreting a gateway response. A declined
//! transaction, a user-input error and a gateway system error are *not*
//! errors at this level; they are [`Outcome`](crate::Outcome) variants.
//! What remains here is the protocol-mismatch class: a response that cannot
//! be read as a flat field mapping, or one whose `errorType` discriminator
//! is not one of the three codes the gateway defines.

use thiserror::Error;

use crate::response::NormalizedResponse;

/// Error interpreting a `TransactionProcess` response body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The body could not be normalized into a field mapping.
    #[error("malformed gateway response: {reason}")]
    Malformed {
        /// What made the body unreadable.
        reason: String,
    },

    /// The `errorType` discriminator was absent or not one of `N`, `U`, `S`.
    #[error("unrecognized gateway outcome: errorType {}", .code.as_deref().unwrap_or("<absent>"))]
    UnrecognizedOutcome {
        /// The discriminator value, if any was present.
        code: Option<String>,
        /// The full normalized response, kept for diagnostics.
        response: Box<NormalizedResponse>,
    },
}

impl ResponseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// A transaction type code that the gateway does not define.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transaction type code: {0:?}")]
pub struct TransactionTypeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_outcome_display_names_missing_code() {
        let err = ResponseError::UnrecognizedOutcome {
            code: None,
            response: Box::default(),
        };
        assert_eq!(
            err.to_string(),
            "unrecognized gateway outcome: errorType <absent>"
        );
    }

    #[test]
    fn malformed_display_includes_reason() {
        let err = ResponseError::malformed("no root element");
        assert_eq!(err.to_string(), "malformed gateway response: no root element");
    }
}
