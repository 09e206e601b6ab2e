use super::expiry::check_not_expired;
use super::voting_power::{verify_commit, verify_commit_trusting};
use crate::error::{MalformedInput, ValidatorSetMismatch, VerifyError};
use crate::options::Options;
use crate::types::{Header, SignedHeader, ValidatorSet};
use time::OffsetDateTime;

/// Verify `untrusted`, more than one height above `trusted`, without the headers in between.
///
/// Validators of the trusted set holding at least `options.trust_threshold`
/// of its power must have signed the new header. With less than a third of
/// that power faulty, at least one honest trusted validator vouches for it.
/// The new header must also carry a full quorum of its own validator set.
pub fn verify_skipping(
    trusted: &Header,
    trusted_vals: &ValidatorSet,
    untrusted: &SignedHeader,
    untrusted_vals: &ValidatorSet,
    now: OffsetDateTime,
    options: &Options,
) -> Result<(), VerifyError> {
    if untrusted.header.height <= trusted.height.saturating_add(1) {
        return Err(MalformedInput::UnexpectedHeight {
            trusted: trusted.height,
            untrusted: untrusted.header.height,
        }
        .into());
    }

    let supplied = untrusted_vals.hash();
    if untrusted.header.validators_hash != supplied {
        return Err(ValidatorSetMismatch::Supplied {
            header: untrusted.header.validators_hash,
            supplied,
        }
        .into());
    }

    check_not_expired(trusted, options.trusting_period, now)?;

    let trusted_supplied = trusted_vals.hash();
    if trusted.next_validators_hash != trusted_supplied {
        return Err(ValidatorSetMismatch::Trusted {
            trusted_next: trusted.next_validators_hash,
            supplied: trusted_supplied,
        }
        .into());
    }

    let chain_id = &untrusted.header.chain_id;
    let block_id = &untrusted.commit.block_id;
    let height = untrusted.header.height;

    verify_commit_trusting(
        trusted_vals,
        chain_id,
        block_id,
        height,
        &untrusted.commit,
        options.trust_threshold,
    )?;

    verify_commit(
        untrusted_vals,
        chain_id,
        block_id,
        height,
        &untrusted.commit,
        options.commit_quorum,
    )?;

    Ok(())
}
