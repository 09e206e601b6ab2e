use crate::error::VerifyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fraction of a validator set's total voting power.
///
/// Used two ways: as a trust level, met by at least the fraction
/// ([`TrustThreshold::min_power_of`]), and as a commit quorum, met only by
/// strictly more than it ([`TrustThreshold::threshold_of`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustThreshold {
    pub numerator: u64,
    pub denominator: u64,
}

impl TrustThreshold {
    /// The default trust level for skipping verification.
    pub const ONE_THIRD: Self = Self::new(1, 3);

    /// The Byzantine quorum every commit must reach within its own validator set.
    pub const TWO_THIRDS: Self = Self::new(2, 3);

    /// Build a fraction without validating it; see [`TrustThreshold::validate`].
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Accepts fractions within [1/3, 1] with positive terms.
    ///
    /// Below 1/3 a coalition holding less than a third of the old voting
    /// power could forge an accepted skip.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.within(1, 3) {
            Ok(())
        } else {
            Err(VerifyError::InvalidTrustLevel {
                numerator: self.numerator,
                denominator: self.denominator,
            })
        }
    }

    /// Accepts fractions within [2/3, 1) with positive terms.
    ///
    /// A quorum must be strictly exceeded, so 1 could never be reached.
    pub fn validate_quorum(&self) -> Result<(), VerifyError> {
        if self.within(2, 3) && self.numerator < self.denominator {
            Ok(())
        } else {
            Err(VerifyError::InvalidCommitQuorum {
                numerator: self.numerator,
                denominator: self.denominator,
            })
        }
    }

    /// `min_num/min_den <= self <= 1`, compared by cross-multiplication in u128.
    fn within(&self, min_num: u64, min_den: u64) -> bool {
        let (n, d) = (self.numerator as u128, self.denominator as u128);
        n > 0 && d > 0 && n <= d && n * min_den as u128 >= d * min_num as u128
    }

    /// The voting power a quorum must exceed: `floor(total * numerator / denominator)`.
    pub fn threshold_of(&self, total: u64) -> u64 {
        let product = total as u128 * self.numerator as u128;
        product
            .checked_div(self.denominator as u128)
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(u64::MAX)
    }

    /// The voting power a trust level requires: `ceil(total * numerator / denominator)`.
    pub fn min_power_of(&self, total: u64) -> u64 {
        let (product, d) = (total as u128 * self.numerator as u128, self.denominator as u128);
        product
            .checked_add(d.saturating_sub(1))
            .and_then(|p| p.checked_div(d))
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(u64::MAX)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl fmt::Display for TrustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Validate a caller-supplied trust level.
pub fn validate_trust_level(level: &TrustThreshold) -> Result<(), VerifyError> {
    level.validate()
}
