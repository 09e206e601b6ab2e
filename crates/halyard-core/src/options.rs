use crate::error::VerifyError;
use crate::verifier::trust::TrustThreshold;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default trusting period: two weeks.
pub const DEFAULT_TRUSTING_PERIOD: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Default tolerance for headers timestamped ahead of the local clock.
pub const DEFAULT_MAX_CLOCK_DRIFT: Duration = Duration::from_secs(10);

/// Verification parameters.
///
/// Every knob that would otherwise be a process-wide constant lives here,
/// so callers (and tests) can pass boundary values explicitly.
/// Missing fields deserialize to their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fraction of the trusted validator set's power that must sign a skipped-to
    /// header. Reaching it exactly is enough.
    pub trust_threshold: TrustThreshold,
    /// Fraction of a header's own validator set that a commit must carry strictly more than.
    pub commit_quorum: TrustThreshold,
    /// How long a trusted header may be used as an anchor.
    pub trusting_period: Duration,
    /// How far ahead of `now` a new header's time may be.
    pub max_clock_drift: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            trust_threshold: TrustThreshold::ONE_THIRD,
            commit_quorum: TrustThreshold::TWO_THIRDS,
            trusting_period: DEFAULT_TRUSTING_PERIOD,
            max_clock_drift: DEFAULT_MAX_CLOCK_DRIFT,
        }
    }
}

impl Options {
    pub fn with_trusting_period(mut self, trusting_period: Duration) -> Self {
        self.trusting_period = trusting_period;
        self
    }

    pub fn with_trust_threshold(mut self, trust_threshold: TrustThreshold) -> Self {
        self.trust_threshold = trust_threshold;
        self
    }

    /// Check both fractions before any signature work is done.
    pub fn validate(&self) -> Result<(), VerifyError> {
        self.trust_threshold.validate()?;
        self.commit_quorum.validate_quorum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = Options::default();
        assert_eq!(options.validate(), Ok(()));
        assert_eq!(options.trust_threshold, TrustThreshold::ONE_THIRD);
        assert_eq!(options.commit_quorum, TrustThreshold::TWO_THIRDS);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{ "trust_threshold": { "numerator": 1, "denominator": 2 } }"#;
        let options: Options = serde_json::from_str(json).unwrap();
        assert_eq!(options.trust_threshold, TrustThreshold::new(1, 2));
        assert_eq!(options.trusting_period, DEFAULT_TRUSTING_PERIOD);
        assert_eq!(options.max_clock_drift, DEFAULT_MAX_CLOCK_DRIFT);
    }

    #[test]
    fn test_weak_commit_quorum_rejected() {
        let options = Options {
            commit_quorum: TrustThreshold::ONE_THIRD,
            ..Options::default()
        };
        assert_eq!(
            options.validate(),
            Err(VerifyError::InvalidCommitQuorum {
                numerator: 1,
                denominator: 3
            })
        );
    }

    #[test]
    fn test_unanimous_trust_level_accepted_but_not_as_quorum() {
        let options = Options::default().with_trust_threshold(TrustThreshold::new(1, 1));
        assert_eq!(options.validate(), Ok(()));

        let options = Options {
            commit_quorum: TrustThreshold::new(1, 1),
            ..Options::default()
        };
        assert!(matches!(options.validate(), Err(VerifyError::InvalidCommitQuorum { .. })));
    }
}
