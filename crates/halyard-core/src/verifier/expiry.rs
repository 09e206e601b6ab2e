use crate::error::VerifyError;
use crate::types::Header;
use std::time::Duration;
use time::OffsetDateTime;

/// The instant `header` stops being usable as a trust anchor.
/// `None` when the trusting period reaches beyond the representable range.
pub fn expires_at(header: &Header, trusting_period: Duration) -> Option<OffsetDateTime> {
    let period = time::Duration::try_from(trusting_period).ok()?;
    header.time.checked_add(period)
}

/// Whether `now - header.time >= trusting_period`.
pub fn header_expired(header: &Header, trusting_period: Duration, now: OffsetDateTime) -> bool {
    match expires_at(header, trusting_period) {
        Some(expired_at) => now >= expired_at,
        None => false,
    }
}

/// Fail with [`VerifyError::Expired`] when the trusted header is too old.
pub fn check_not_expired(
    header: &Header,
    trusting_period: Duration,
    now: OffsetDateTime,
) -> Result<(), VerifyError> {
    match expires_at(header, trusting_period) {
        Some(expired_at) if now >= expired_at => Err(VerifyError::Expired { expired_at, now }),
        _ => Ok(()),
    }
}
