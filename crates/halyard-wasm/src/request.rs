//! JSON request/response shapes for the JavaScript surface.
//!
//! Kept free of `wasm-bindgen` types so it can be exercised natively.

use halyard_core::{verify, Header, Options, SignedHeader, ValidatorSet};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Everything needed for one verification call.
#[derive(Serialize, Deserialize)]
pub struct VerifyRequest {
    pub chain_id: String,
    /// The header already trusted (its commit is not needed).
    pub trusted_header: Header,
    /// The validator set the trusted header names as next validators.
    pub trusted_validators: ValidatorSet,
    pub untrusted_header: SignedHeader,
    pub untrusted_validators: ValidatorSet,
    #[serde(default)]
    pub options: Options,
}

/// The verdict returned to JavaScript.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
    pub trusted_height: u64,
    pub untrusted_height: u64,
    /// Machine-readable error kind, e.g. `"not_enough_voting_power"`.
    pub error_kind: Option<String>,
    pub error: Option<String>,
}

/// Parse an RFC 3339 timestamp supplied by the caller as "now".
pub fn parse_now(now: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(now, &Rfc3339).map_err(|e| format!("Invalid timestamp '{}': {}", now, e))
}

/// Current time from milliseconds since the Unix epoch (as JavaScript's `Date.now()`).
pub fn now_from_unix_millis(millis: f64) -> Result<OffsetDateTime, String> {
    let nanos = (millis as i128) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|e| format!("Invalid clock value {}: {}", millis, e))
}

/// Decode a request, verify it, and describe the outcome.
///
/// Only malformed JSON is an `Err`; a rejected header is a normal response
/// with `verified: false`.
pub fn handle_verify(request_json: &str, now: OffsetDateTime) -> Result<VerifyResponse, String> {
    let request: VerifyRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid verify request JSON: {}", e))?;

    let result = verify(
        &request.chain_id,
        &request.trusted_header,
        &request.trusted_validators,
        &request.untrusted_header,
        &request.untrusted_validators,
        now,
        &request.options,
    );

    let (error_kind, error) = match &result {
        Ok(()) => (None, None),
        Err(e) => (Some(e.kind().to_string()), Some(e.to_string())),
    };

    Ok(VerifyResponse {
        verified: result.is_ok(),
        trusted_height: request.trusted_header.height,
        untrusted_height: request.untrusted_header.header.height,
        error_kind,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use halyard_core::test_utils::TestKeys;
    use std::time::Duration;
    use time::macros::datetime;

    const CHAIN_ID: &str = "wasm-chain";

    fn request_json(signers_from: usize) -> String {
        let keys = TestKeys::generate(4);
        let vals = keys.to_validators(20, 10);
        let t = datetime!(2024-05-01 12:00 UTC);
        let trusted = keys.gen_signed_header(CHAIN_ID, 1, t, &vals, &vals, 0, 4);
        let untrusted = keys.gen_signed_header(
            CHAIN_ID,
            2,
            t + Duration::from_secs(6),
            &vals,
            &vals,
            signers_from,
            4,
        );

        let request = VerifyRequest {
            chain_id: CHAIN_ID.to_string(),
            trusted_header: trusted.header,
            trusted_validators: vals.clone(),
            untrusted_header: untrusted,
            untrusted_validators: vals,
            options: Options::default(),
        };
        serde_json::to_string(&request).unwrap()
    }

    #[test]
    fn test_verified_request() {
        let now = datetime!(2024-05-01 12:01 UTC);
        let response = handle_verify(&request_json(0), now).unwrap();
        assert_eq!(
            response,
            VerifyResponse {
                verified: true,
                trusted_height: 1,
                untrusted_height: 2,
                error_kind: None,
                error: None,
            }
        );
    }

    #[test]
    fn test_rejected_request_reports_kind() {
        let now = datetime!(2024-05-01 12:01 UTC);
        let response = handle_verify(&request_json(3), now).unwrap();
        assert!(!response.verified);
        assert_eq!(response.error_kind.as_deref(), Some("not_enough_voting_power"));
        assert!(response.error.unwrap().contains("got 50"));
    }

    #[test]
    fn test_options_default_when_omitted() {
        let mut value: serde_json::Value = serde_json::from_str(&request_json(0)).unwrap();
        value.as_object_mut().unwrap().remove("options");
        let now = datetime!(2024-05-01 12:01 UTC);
        let response = handle_verify(&value.to_string(), now).unwrap();
        assert!(response.verified);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let now = datetime!(2024-05-01 12:01 UTC);
        assert!(handle_verify("{ not json", now).is_err());
    }

    #[test]
    fn test_parse_now() {
        assert_eq!(
            parse_now("2024-05-01T12:01:00Z").unwrap(),
            datetime!(2024-05-01 12:01 UTC)
        );
        assert!(parse_now("yesterday").is_err());
    }

    #[test]
    fn test_now_from_unix_millis() {
        assert_eq!(
            now_from_unix_millis(1_000.0).unwrap(),
            datetime!(1970-01-01 0:00:01 UTC)
        );
    }
}
