use super::{hex_bytes, Address, Hash, ADDRESS_LEN};
use crate::crypto::{merkle_root, sha256_hash};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Number of bytes in an Ed25519 public key.
pub const ED25519_PUBKEY_LEN: usize = 32;

/// Number of bytes in a BLS12-381 public key (compressed G1 point).
pub const BLS_PUBKEY_LEN: usize = 48;

/// Upper bound on the total voting power of a validator set.
/// Leaves headroom so that `total * numerator` never overflows in threshold arithmetic.
pub const MAX_TOTAL_VOTING_POWER: u64 = (i64::MAX / 8) as u64;

/// An Ed25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; ED25519_PUBKEY_LEN]);

hex_bytes!(Ed25519PublicKey, ED25519_PUBKEY_LEN, "Ed25519 public key");

/// A BLS12-381 public key (48 bytes, compressed G1 point).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlsPublicKey(pub [u8; BLS_PUBKEY_LEN]);

hex_bytes!(BlsPublicKey, BLS_PUBKEY_LEN, "BLS public key");

/// A validator's consensus key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Bls12381(BlsPublicKey),
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(key) => &key.0,
            PublicKey::Bls12381(key) => &key.0,
        }
    }

    /// One-byte key type tag, part of the canonical validator encoding.
    fn type_tag(&self) -> u8 {
        match self {
            PublicKey::Ed25519(_) => 0x01,
            PublicKey::Bls12381(_) => 0x02,
        }
    }

    /// The address derived from this key: SHA256(key bytes)[..20].
    pub fn address(&self) -> Address {
        let digest = sha256_hash(self.as_bytes());
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&digest[..ADDRESS_LEN]);
        Address(address)
    }
}

/// A vote signature. Length depends on the key type (64 bytes Ed25519, 96 bytes BLS).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Errors raised while assembling a validator set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorSetError {
    #[error("Validator set is empty")]
    Empty,

    #[error("Duplicate validator {address}")]
    DuplicateValidator { address: Address },

    #[error("Validator {address} has zero voting power")]
    ZeroVotingPower { address: Address },

    #[error("Validator address {address} does not match its public key (expected {expected})")]
    AddressMismatch { address: Address, expected: Address },

    #[error("Total voting power exceeds the maximum of {max}")]
    TotalVotingPowerOverflow { max: u64 },
}

/// A member of a validator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Derived from `pub_key`; checked when the set is built.
    pub address: Address,
    pub pub_key: PublicKey,
    pub voting_power: u64,
}

impl Validator {
    pub fn new(pub_key: PublicKey, voting_power: u64) -> Self {
        Self {
            address: pub_key.address(),
            pub_key,
            voting_power,
        }
    }

    /// Canonical encoding hashed into the validator set root:
    /// key type tag, key bytes, big-endian voting power.
    fn encode(&self) -> Vec<u8> {
        let key = self.pub_key.as_bytes();
        let mut out = Vec::with_capacity(1 + key.len() + 8);
        out.push(self.pub_key.type_tag());
        out.extend_from_slice(key);
        out.extend_from_slice(&self.voting_power.to_be_bytes());
        out
    }
}

/// An ordered set of validators, unique by address.
///
/// The order is significant: commits produced by this set carry one
/// signature slot per validator, in this order, and the set hash commits to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValidatorSet", into = "RawValidatorSet")]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    total_voting_power: u64,
}

#[derive(Serialize, Deserialize)]
struct RawValidatorSet {
    validators: Vec<Validator>,
}

impl TryFrom<RawValidatorSet> for ValidatorSet {
    type Error = ValidatorSetError;

    fn try_from(raw: RawValidatorSet) -> Result<Self, Self::Error> {
        ValidatorSet::new(raw.validators)
    }
}

impl From<ValidatorSet> for RawValidatorSet {
    fn from(set: ValidatorSet) -> Self {
        RawValidatorSet {
            validators: set.validators,
        }
    }
}

impl ValidatorSet {
    /// Build a validator set, enforcing unique addresses, addresses that match
    /// their keys, non-zero voting powers and a bounded total.
    pub fn new(validators: Vec<Validator>) -> Result<Self, ValidatorSetError> {
        if validators.is_empty() {
            return Err(ValidatorSetError::Empty);
        }

        let mut seen = HashSet::with_capacity(validators.len());
        let mut total: u64 = 0;

        for validator in &validators {
            let expected = validator.pub_key.address();
            if validator.address != expected {
                return Err(ValidatorSetError::AddressMismatch {
                    address: validator.address,
                    expected,
                });
            }
            if !seen.insert(validator.address) {
                return Err(ValidatorSetError::DuplicateValidator {
                    address: validator.address,
                });
            }
            if validator.voting_power == 0 {
                return Err(ValidatorSetError::ZeroVotingPower {
                    address: validator.address,
                });
            }
            total = total
                .checked_add(validator.voting_power)
                .filter(|t| *t <= MAX_TOTAL_VOTING_POWER)
                .ok_or(ValidatorSetError::TotalVotingPowerOverflow {
                    max: MAX_TOTAL_VOTING_POWER,
                })?;
        }

        Ok(Self {
            validators,
            total_voting_power: total,
        })
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn total_voting_power(&self) -> u64 {
        self.total_voting_power
    }

    /// Look up a validator by address, returning its index in the set.
    pub fn get_by_address(&self, address: &Address) -> Option<(usize, &Validator)> {
        self.validators
            .iter()
            .enumerate()
            .find(|(_, v)| v.address == *address)
    }

    /// Merkle root over the canonical encoding of every validator, in set order.
    /// This is the value headers commit to in `validators_hash` / `next_validators_hash`.
    pub fn hash(&self) -> Hash {
        let leaves: Vec<Vec<u8>> = self.validators.iter().map(Validator::encode).collect();
        Hash(merkle_root(&leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestKeys;

    #[test]
    fn test_total_voting_power() {
        let vals = TestKeys::generate(4).to_validators(20, 10);
        assert_eq!(vals.len(), 4);
        assert_eq!(vals.total_voting_power(), 140);
    }

    #[test]
    fn test_duplicate_validator_rejected() {
        let keys = TestKeys::generate(1);
        let v = Validator::new(keys.pub_key(0), 10);
        let result = ValidatorSet::new(vec![v.clone(), v]);
        assert!(matches!(
            result,
            Err(ValidatorSetError::DuplicateValidator { .. })
        ));
    }

    #[test]
    fn test_zero_power_and_empty_rejected() {
        let keys = TestKeys::generate(1);
        let result = ValidatorSet::new(vec![Validator::new(keys.pub_key(0), 0)]);
        assert!(matches!(result, Err(ValidatorSetError::ZeroVotingPower { .. })));

        assert_eq!(ValidatorSet::new(vec![]), Err(ValidatorSetError::Empty));
    }

    #[test]
    fn test_total_voting_power_overflow_rejected() {
        let keys = TestKeys::generate(2);
        let result = ValidatorSet::new(vec![
            Validator::new(keys.pub_key(0), MAX_TOTAL_VOTING_POWER),
            Validator::new(keys.pub_key(1), 1),
        ]);
        assert!(matches!(
            result,
            Err(ValidatorSetError::TotalVotingPowerOverflow { .. })
        ));
    }

    #[test]
    fn test_forged_address_rejected() {
        let keys = TestKeys::generate(2);
        let mut v = Validator::new(keys.pub_key(0), 10);
        v.address = keys.pub_key(1).address();
        assert!(matches!(
            ValidatorSet::new(vec![v]),
            Err(ValidatorSetError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_hash_depends_on_order_and_power() {
        let keys = TestKeys::generate(3);
        let a = keys.to_validators(10, 1);
        let b = keys.to_validators(10, 2);
        assert_ne!(a.hash(), b.hash());

        let mut reversed = a.validators().to_vec();
        reversed.reverse();
        let reversed = ValidatorSet::new(reversed).unwrap();
        assert_ne!(a.hash(), reversed.hash());

        assert_eq!(a.hash(), keys.to_validators(10, 1).hash());
    }

    #[test]
    fn test_get_by_address() {
        let keys = TestKeys::generate(3);
        let vals = keys.to_validators(10, 10);
        let address = keys.pub_key(2).address();
        let (index, validator) = vals.get_by_address(&address).unwrap();
        assert_eq!(index, 2);
        assert_eq!(validator.voting_power, 30);

        let stranger = TestKeys::generate(5).pub_key(4).address();
        assert!(vals.get_by_address(&stranger).is_none());
    }

    #[test]
    fn test_json_roundtrip_revalidates() {
        let vals = TestKeys::generate(2).to_validators(5, 5);
        let json = serde_json::to_string(&vals).unwrap();
        let back: ValidatorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vals);
        assert_eq!(back.total_voting_power(), 15);

        // Zeroing a voting power in transit is caught on decode
        let tampered = json.replace("\"voting_power\":5", "\"voting_power\":0");
        assert!(serde_json::from_str::<ValidatorSet>(&tampered).is_err());
    }
}
