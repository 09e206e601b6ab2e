use super::trust::TrustThreshold;
use crate::crypto::{verify_signature, vote_sign_bytes};
use crate::error::{MalformedInput, VerifyError};
use crate::types::{Address, BlockId, Commit, CommitSig, ValidatorSet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Voting power of a reference validator set found among a commit's signatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VotingPowerTally {
    /// Total voting power of the reference set.
    pub total: u64,
    /// Power of reference validators with a valid vote for the committed block.
    pub tallied: u64,
    /// Number of reference validators counted in `tallied`.
    pub signers: usize,
}

/// Sum the voting power of `validators` attested by `commit`.
///
/// Signers are matched by address, not by slot index: the commit may have been
/// produced by an entirely different validator set. Votes from addresses outside
/// `validators` are ignored, as are nil votes and signatures that do not verify.
/// The same address voting twice makes the commit malformed.
pub fn voting_power_in(
    chain_id: &str,
    commit: &Commit,
    validators: &ValidatorSet,
) -> Result<VotingPowerTally, VerifyError> {
    let mut tally = VotingPowerTally {
        total: validators.total_voting_power(),
        ..VotingPowerTally::default()
    };
    let mut seen: HashMap<Address, usize> = HashMap::with_capacity(commit.signatures.len());

    for (index, commit_sig) in commit.signatures.iter().enumerate() {
        let (address, signature, block_id) = match commit_sig {
            CommitSig::Absent => continue,
            CommitSig::ForBlock {
                validator_address,
                signature,
            } => (validator_address, signature, Some(&commit.block_id)),
            CommitSig::Nil {
                validator_address,
                signature,
            } => (validator_address, signature, None),
        };

        if let Some(first) = seen.insert(*address, index) {
            return Err(MalformedInput::DoubleVote {
                address: *address,
                first,
                second: index,
            }
            .into());
        }

        let Some((_, validator)) = validators.get_by_address(address) else {
            continue;
        };

        let sign_bytes = vote_sign_bytes(chain_id, commit.height, commit.round, block_id);
        if let Err(error) = verify_signature(&validator.pub_key, &sign_bytes, signature) {
            warn!(index, %address, %error, "ignoring commit signature that failed verification");
            continue;
        }

        if block_id.is_some() {
            tally.tallied = tally.tallied.saturating_add(validator.voting_power);
            tally.signers += 1;
        }
    }

    debug!(
        height = commit.height,
        tallied = tally.tallied,
        total = tally.total,
        signers = tally.signers,
        "tallied commit voting power"
    );

    Ok(tally)
}

/// Check that validators from `validators` holding at least `trust_level` of
/// its total power signed `commit`, wherever they sit in it.
///
/// Used with the trusted validator set and the trust level when skipping.
/// `needed` in the error is `ceil(total * trust_level)`.
pub fn verify_commit_trusting(
    validators: &ValidatorSet,
    chain_id: &str,
    block_id: &BlockId,
    height: u64,
    commit: &Commit,
    trust_level: TrustThreshold,
) -> Result<VotingPowerTally, VerifyError> {
    check_commit_target(block_id, height, commit)?;

    let tally = voting_power_in(chain_id, commit, validators)?;
    let needed = trust_level.min_power_of(tally.total);
    if tally.tallied < needed {
        return Err(VerifyError::NotEnoughVotingPower {
            got: tally.tallied,
            needed,
        });
    }

    Ok(tally)
}

/// Check that `commit` is a valid commit of `validators` itself: one slot per
/// validator, in set order, with more than `quorum` of the set's power signing.
///
/// `needed` in the error is `floor(total * quorum)`, which must be exceeded.
pub fn verify_commit(
    validators: &ValidatorSet,
    chain_id: &str,
    block_id: &BlockId,
    height: u64,
    commit: &Commit,
    quorum: TrustThreshold,
) -> Result<VotingPowerTally, VerifyError> {
    if commit.signatures.len() != validators.len() {
        return Err(MalformedInput::CommitSizeMismatch {
            validators: validators.len(),
            signatures: commit.signatures.len(),
        }
        .into());
    }

    for (index, (commit_sig, validator)) in commit
        .signatures
        .iter()
        .zip(validators.validators())
        .enumerate()
    {
        if let Some(address) = commit_sig.validator_address() {
            if *address != validator.address {
                return Err(MalformedInput::CommitSignerMismatch {
                    index,
                    expected: validator.address,
                    got: *address,
                }
                .into());
            }
        }
    }

    check_commit_target(block_id, height, commit)?;

    let tally = voting_power_in(chain_id, commit, validators)?;
    let needed = quorum.threshold_of(tally.total);
    if tally.tallied <= needed {
        return Err(VerifyError::NotEnoughVotingPower {
            got: tally.tallied,
            needed,
        });
    }

    Ok(tally)
}

fn check_commit_target(block_id: &BlockId, height: u64, commit: &Commit) -> Result<(), VerifyError> {
    if commit.height != height {
        return Err(MalformedInput::CommitHeightMismatch {
            header: height,
            commit: commit.height,
        }
        .into());
    }
    if commit.block_id != *block_id {
        return Err(MalformedInput::CommitBlockIdMismatch {
            expected: block_id.hash,
            got: commit.block_id.hash,
        }
        .into());
    }
    Ok(())
}
