//! Header verification: the single entry point [`verify`] and the pieces it is built from.
//!
//! Every function here is a pure predicate over borrowed inputs. The current
//! time is always passed in, never read from the system clock.

pub mod adjacent;
pub mod expiry;
pub mod skipping;
pub mod trust;
pub mod voting_power;

pub use adjacent::verify_adjacent;
pub use expiry::{check_not_expired, header_expired};
pub use skipping::verify_skipping;
pub use trust::{validate_trust_level, TrustThreshold};
pub use voting_power::{verify_commit, verify_commit_trusting, voting_power_in, VotingPowerTally};

use crate::error::VerifyError;
use crate::options::Options;
use crate::types::{Header, SignedHeader, ValidatorSet};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

/// Decide whether `untrusted` can be trusted, starting from `trusted`.
///
/// 1. Validates the trust parameters in `options`
/// 2. Checks `untrusted` is well formed and belongs to `chain_id`
/// 3. Requires a strictly greater height and a later, not-from-the-future time
/// 4. Runs adjacent verification for `trusted.height + 1`, skipping verification otherwise
///
/// `trusted_vals` must be the set `trusted` names in `next_validators_hash`;
/// `untrusted_vals` the set `untrusted` names in `validators_hash`.
#[instrument(
    level = "debug",
    skip_all,
    fields(chain_id = %chain_id, trusted_height = trusted.height, untrusted_height = untrusted.header.height)
)]
pub fn verify(
    chain_id: &str,
    trusted: &Header,
    trusted_vals: &ValidatorSet,
    untrusted: &SignedHeader,
    untrusted_vals: &ValidatorSet,
    now: OffsetDateTime,
    options: &Options,
) -> Result<(), VerifyError> {
    let result = dispatch(chain_id, trusted, trusted_vals, untrusted, untrusted_vals, now, options);

    match &result {
        Ok(()) => debug!("header verified"),
        Err(error) => warn!(kind = error.kind(), %error, "header rejected"),
    }

    result
}

fn dispatch(
    chain_id: &str,
    trusted: &Header,
    trusted_vals: &ValidatorSet,
    untrusted: &SignedHeader,
    untrusted_vals: &ValidatorSet,
    now: OffsetDateTime,
    options: &Options,
) -> Result<(), VerifyError> {
    options.validate()?;

    untrusted.validate_basic(chain_id)?;

    let header = &untrusted.header;
    if header.height <= trusted.height {
        return Err(VerifyError::HeightNotIncreasing {
            trusted: trusted.height,
            untrusted: header.height,
        });
    }

    if header.time <= trusted.time {
        return Err(VerifyError::NonMonotonicTime {
            trusted: trusted.time,
            untrusted: header.time,
        });
    }

    let latest_allowed = time::Duration::try_from(options.max_clock_drift)
        .ok()
        .and_then(|drift| now.checked_add(drift));
    if let Some(latest_allowed) = latest_allowed {
        if header.time >= latest_allowed {
            return Err(VerifyError::HeaderFromFuture {
                header_time: header.time,
                now,
                max_clock_drift: options.max_clock_drift,
            });
        }
    }

    if header.height == trusted.height + 1 {
        debug!("verifying adjacent header");
        verify_adjacent(trusted, untrusted, untrusted_vals, now, options)
    } else {
        debug!("verifying non-adjacent header");
        verify_skipping(trusted, trusted_vals, untrusted, untrusted_vals, now, options)
    }
}
