//! # Halyard Core
//!
//! Pure Rust light client header verification.
//!
//! This crate contains **no networking code** and **no storage**. Given a
//! header the caller already trusts, it decides whether a newer, untrusted
//! header can be trusted too, without downloading the blocks in between.
//!
//! ## Trust Model
//!
//! - **Adjacent verification** (`trusted.height + 1`): the trusted header
//!   committed to the next validator set; that set must have signed the new
//!   header with more than 2/3 of its voting power.
//!
//! - **Skipping verification** (any greater height): validators of the
//!   trusted set holding at least the trust level (1/3 by default) of its
//!   voting power must have signed the new header, which must also carry
//!   more than 2/3 of its own validator set.
//!
//! - **Trusting period**: a trusted header older than the trusting period is
//!   never used as an anchor, however valid its signatures.
//!
//! ## Usage
//!
//! ```ignore
//! use halyard_core::{verify, Options};
//!
//! verify(chain_id, &trusted.header, &trusted_next_vals, &untrusted, &untrusted_vals, now, &Options::default())?;
//! ```

pub mod crypto;
pub mod error;
pub mod options;
pub mod types;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use error::{MalformedInput, ValidatorSetMismatch, VerifyError};
pub use options::Options;
pub use types::*;
pub use verifier::{header_expired, validate_trust_level, verify, TrustThreshold};
