use crate::types::{Address, Hash};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

/// Why header verification failed.
/// Each variant carries the values that decided the outcome, so callers can
/// match on the kind instead of parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("Invalid trust level {numerator}/{denominator}: must be within [1/3, 1]")]
    InvalidTrustLevel { numerator: u64, denominator: u64 },

    #[error("Invalid commit quorum {numerator}/{denominator}: must be within [2/3, 1)")]
    InvalidCommitQuorum { numerator: u64, denominator: u64 },

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("Expected new header height {untrusted} to be greater than trusted header height {trusted}")]
    HeightNotIncreasing { trusted: u64, untrusted: u64 },

    #[error("Expected new header time {untrusted} to be after trusted header time {trusted}")]
    NonMonotonicTime {
        trusted: OffsetDateTime,
        untrusted: OffsetDateTime,
    },

    #[error("New header time {header_time} is too far in the future (now {now}, max clock drift {max_clock_drift:?})")]
    HeaderFromFuture {
        header_time: OffsetDateTime,
        now: OffsetDateTime,
        max_clock_drift: Duration,
    },

    #[error("Validator set mismatch: {0}")]
    ValidatorSetMismatch(#[from] ValidatorSetMismatch),

    #[error("Old header has expired at {expired_at} (now {now})")]
    Expired {
        expired_at: OffsetDateTime,
        now: OffsetDateTime,
    },

    /// For a trust level `got` must reach `needed`; for a commit quorum it must exceed it.
    #[error("Not enough voting power signed: got {got}, needed {needed}")]
    NotEnoughVotingPower { got: u64, needed: u64 },
}

impl VerifyError {
    /// Stable, machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::InvalidTrustLevel { .. } => "invalid_trust_level",
            VerifyError::InvalidCommitQuorum { .. } => "invalid_commit_quorum",
            VerifyError::MalformedInput(_) => "malformed_input",
            VerifyError::HeightNotIncreasing { .. } => "height_not_increasing",
            VerifyError::NonMonotonicTime { .. } => "non_monotonic_time",
            VerifyError::HeaderFromFuture { .. } => "header_from_future",
            VerifyError::ValidatorSetMismatch(_) => "validator_set_mismatch",
            VerifyError::Expired { .. } => "expired",
            VerifyError::NotEnoughVotingPower { .. } => "not_enough_voting_power",
        }
    }
}

/// Structural problems with a signed header or commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInput {
    #[error("signed header belongs to another chain '{got}' not '{expected}'")]
    ChainIdMismatch { expected: String, got: String },

    #[error("header height must be positive")]
    ZeroHeight,

    #[error("commit height {commit} does not match header height {header}")]
    CommitHeightMismatch { header: u64, commit: u64 },

    #[error("commit signs block {got}, expected {expected}")]
    CommitBlockIdMismatch { expected: Hash, got: Hash },

    #[error("commit has no signatures")]
    EmptyCommit,

    #[error("commit has {signatures} signatures for {validators} validators")]
    CommitSizeMismatch { validators: usize, signatures: usize },

    #[error("commit signature #{index} is from {got}, expected validator {expected}")]
    CommitSignerMismatch {
        index: usize,
        expected: Address,
        got: Address,
    },

    #[error("double vote from {address} (#{first} and #{second})")]
    DoubleVote {
        address: Address,
        first: usize,
        second: usize,
    },

    #[error("header at height {untrusted} cannot be verified on this path from trusted height {trusted}")]
    UnexpectedHeight { trusted: u64, untrusted: u64 },
}

/// Which validator-set hash comparison failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorSetMismatch {
    #[error("expected new header validators ({header}) to match those that were supplied ({supplied})")]
    Supplied { header: Hash, supplied: Hash },

    #[error("expected old header next validators ({trusted_next}) to match those from new header ({untrusted})")]
    NextValidators { trusted_next: Hash, untrusted: Hash },

    #[error("expected old header next validators ({trusted_next}) to match the supplied trusted validators ({supplied})")]
    Trusted { trusted_next: Hash, supplied: Hash },
}
