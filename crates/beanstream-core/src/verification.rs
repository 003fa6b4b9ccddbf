//! Card verification (CVD) and address verification (AVS) results reported
//! on every normal response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of the card verification data check (`cvdId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CvdResult {
    /// `1`
    Match,
    /// `2`
    Mismatch,
    /// `3`
    NotVerified,
    /// `4`
    ShouldHaveBeenPresent,
    /// `5`
    IssuerUnableToProcess,
    /// `6`
    NotProvided,
    /// Any code the gateway adds later.
    Other(String),
}

impl CvdResult {
    /// Map a `cvdId` code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => Self::Match,
            "2" => Self::Mismatch,
            "3" => Self::NotVerified,
            "4" => Self::ShouldHaveBeenPresent,
            "5" => Self::IssuerUnableToProcess,
            "6" => Self::NotProvided,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Match => "1",
            Self::Mismatch => "2",
            Self::NotVerified => "3",
            Self::ShouldHaveBeenPresent => "4",
            Self::IssuerUnableToProcess => "5",
            Self::NotProvided => "6",
            Self::Other(code) => code,
        }
    }

    /// Whether the check passed.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Match => "CVD Match",
            Self::Mismatch => "CVD Mismatch",
            Self::NotVerified => "CVD Not Verified",
            Self::ShouldHaveBeenPresent => "CVD Should have been present",
            Self::IssuerUnableToProcess => "CVD Issuer unable to process request",
            Self::NotProvided => "CVD Not Provided",
            Self::Other(_) => "CVD result unknown",
        }
    }
}

impl fmt::Display for CvdResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "{} ({code})", self.description()),
            _ => f.write_str(self.description()),
        }
    }
}

/// Address verification indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsResult {
    /// Whether the issuer performed address verification at all.
    pub processed: bool,
    pub postal_match: bool,
    pub address_match: bool,
}

impl AvsResult {
    /// Both the street address and postal code matched.
    pub fn is_full_match(&self) -> bool {
        self.processed && self.postal_match && self.address_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_variants() {
        assert_eq!(CvdResult::from_code("1"), CvdResult::Match);
        assert_eq!(CvdResult::from_code("2"), CvdResult::Mismatch);
        assert_eq!(CvdResult::from_code("6"), CvdResult::NotProvided);
        assert_eq!(CvdResult::from_code("4").code(), "4");
    }

    #[test]
    fn unknown_code_is_preserved() {
        let cvd = CvdResult::from_code("9");
        assert_eq!(cvd, CvdResult::Other("9".into()));
        assert_eq!(cvd.code(), "9");
        assert!(!cvd.is_match());
        assert_eq!(cvd.to_string(), "CVD result unknown (9)");
    }

    #[test]
    fn descriptions_match_gateway_wording() {
        assert_eq!(CvdResult::Mismatch.to_string(), "CVD Mismatch");
        assert_eq!(
            CvdResult::IssuerUnableToProcess.description(),
            "CVD Issuer unable to process request"
        );
    }

    #[test]
    fn avs_full_match_requires_all_flags() {
        let avs = AvsResult {
            processed: true,
            postal_match: true,
            address_match: false,
        };
        assert!(!avs.is_full_match());
        assert!(AvsResult { address_match: true, ..avs }.is_full_match());
    }
}
