use super::expiry::check_not_expired;
use super::voting_power::verify_commit;
use crate::error::{MalformedInput, ValidatorSetMismatch, VerifyError};
use crate::options::Options;
use crate::types::{Header, SignedHeader, ValidatorSet};
use time::OffsetDateTime;

/// Verify `untrusted`, exactly one height above `trusted`.
///
/// The trusted header already committed to the validator set allowed to sign
/// the next block (`next_validators_hash`), so it is enough to check that this
/// set is the one that signed, with a full quorum.
pub fn verify_adjacent(
    trusted: &Header,
    untrusted: &SignedHeader,
    untrusted_vals: &ValidatorSet,
    now: OffsetDateTime,
    options: &Options,
) -> Result<(), VerifyError> {
    if trusted.height.checked_add(1) != Some(untrusted.header.height) {
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

    if trusted.next_validators_hash != untrusted.header.validators_hash {
        return Err(ValidatorSetMismatch::NextValidators {
            trusted_next: trusted.next_validators_hash,
            untrusted: untrusted.header.validators_hash,
        }
        .into());
    }

    verify_commit(
        untrusted_vals,
        &untrusted.header.chain_id,
        &untrusted.commit.block_id,
        untrusted.header.height,
        &untrusted.commit,
        options.commit_quorum,
    )?;

    Ok(())
}
