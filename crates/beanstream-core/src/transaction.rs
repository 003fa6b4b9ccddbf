//! # Transaction Types
//!
//! The gateway selects the operation performed by `TransactionProcess`
//! through the `trnType` request field. Only the five types below are
//! issued by this client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransactionTypeError;

/// A `trnType` code accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Authorize and capture in one step (`P`).
    Purchase,
    /// Authorize only; funds are held until completion (`PA`).
    PreAuth,
    /// Capture a previous pre-authorization (`PAC`).
    Completion,
    /// Return funds from a previous purchase or completion (`R`).
    Refund,
    /// Cancel a same-day purchase before settlement (`VP`).
    Void,
}

impl TransactionType {
    /// All transaction types, in wire-code order.
    pub const ALL: [TransactionType; 5] = [
        Self::Purchase,
        Self::PreAuth,
        Self::Completion,
        Self::Refund,
        Self::Void,
    ];

    /// The `trnType` wire code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Purchase => "P",
            Self::PreAuth => "PA",
            Self::Completion => "PAC",
            Self::Refund => "R",
            Self::Void => "VP",
        }
    }

    /// Whether this type references an earlier transaction through `adjId`.
    pub fn is_adjustment(&self) -> bool {
        matches!(self, Self::Completion | Self::Refund | Self::Void)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purchase => write!(f, "purchase"),
            Self::PreAuth => write!(f, "pre-authorization"),
            Self::Completion => write!(f, "pre-auth completion"),
            Self::Refund => write!(f, "refund"),
            Self::Void => write!(f, "void"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_code() == s)
            .ok_or_else(|| TransactionTypeError(s.to_string()))
    }
}
