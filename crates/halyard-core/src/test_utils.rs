//! Deterministic keys and signed headers for tests.
//!
//! Keys are derived from fixed seeds, so the same index always yields the
//! same validator across test runs and across `TestKeys` instances.

use crate::crypto::{sha256_hash, vote_sign_bytes, BLS_DST};
use crate::types::{
    BlockId, BlsPublicKey, Commit, CommitSig, Ed25519PublicKey, Hash, Header, PartSetHeader,
    PublicKey, Signature, SignedHeader, Validator, ValidatorSet,
};
use ed25519_dalek::{Signer, SigningKey};
use time::OffsetDateTime;

/// A private key able to sign votes.
#[derive(Clone)]
pub enum TestKey {
    Ed25519(SigningKey),
    Bls(blst::min_pk::SecretKey),
}

impl TestKey {
    pub fn ed25519(seed: u8) -> Self {
        TestKey::Ed25519(SigningKey::from_bytes(&[seed; 32]))
    }

    pub fn bls(seed: u8) -> Self {
        let ikm = sha256_hash(&[b'b', b'l', b's', seed]);
        // key_gen only fails for ikm shorter than 32 bytes
        let sk = blst::min_pk::SecretKey::key_gen(&ikm, &[]).expect("32-byte ikm");
        TestKey::Bls(sk)
    }

    pub fn pub_key(&self) -> PublicKey {
        match self {
            TestKey::Ed25519(sk) => PublicKey::Ed25519(Ed25519PublicKey(sk.verifying_key().to_bytes())),
            TestKey::Bls(sk) => PublicKey::Bls12381(BlsPublicKey(sk.sk_to_pk().to_bytes())),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        match self {
            TestKey::Ed25519(sk) => Signature(sk.sign(message).to_bytes().to_vec()),
            TestKey::Bls(sk) => Signature(sk.sign(message, BLS_DST, &[]).to_bytes().to_vec()),
        }
    }
}

/// An ordered list of test keys.
#[derive(Clone)]
pub struct TestKeys(Vec<TestKey>);

impl TestKeys {
    /// `n` Ed25519 keys; key `i` is seeded with `i + 1`.
    pub fn generate(n: usize) -> Self {
        Self((0..n).map(|i| TestKey::ed25519(i as u8 + 1)).collect())
    }

    /// `n` BLS12-381 keys; key `i` is seeded with `i + 1`.
    pub fn generate_bls(n: usize) -> Self {
        Self((0..n).map(|i| TestKey::bls(i as u8 + 1)).collect())
    }

    pub fn from_keys(keys: Vec<TestKey>) -> Self {
        Self(keys)
    }

    /// Keys `start..end`, keeping their identities.
    pub fn range(&self, start: usize, end: usize) -> Self {
        Self(self.0[start..end].to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key(&self, index: usize) -> &TestKey {
        &self.0[index]
    }

    pub fn pub_key(&self, index: usize) -> PublicKey {
        self.0[index].pub_key()
    }

    /// A validator set of these keys, in order, with voting powers
    /// `init`, `init + inc`, `init + 2 * inc`, ...
    pub fn to_validators(&self, init: u64, inc: u64) -> ValidatorSet {
        let validators = self
            .0
            .iter()
            .enumerate()
            .map(|(i, key)| Validator::new(key.pub_key(), init + inc * i as u64))
            .collect();
        ValidatorSet::new(validators).expect("test keys form a valid validator set")
    }

    /// A header at `height` committing to `vals` / `next_vals`, with a commit
    /// in which keys `first..last` (indices into these keys) vote for the block.
    /// Every other slot of `vals` is absent.
    #[allow(clippy::too_many_arguments)]
    pub fn gen_signed_header(
        &self,
        chain_id: &str,
        height: u64,
        time: OffsetDateTime,
        vals: &ValidatorSet,
        next_vals: &ValidatorSet,
        first: usize,
        last: usize,
    ) -> SignedHeader {
        let header = Header {
            chain_id: chain_id.to_string(),
            height,
            time,
            last_block_id: None,
            validators_hash: vals.hash(),
            next_validators_hash: next_vals.hash(),
            consensus_hash: Hash(sha256_hash(b"cons_hash")),
            app_hash: Hash(sha256_hash(b"app_hash")),
            last_results_hash: Hash(sha256_hash(b"results_hash")),
            proposer_address: vals.validators()[0].address,
        };

        let block_id = BlockId {
            hash: header.hash(),
            part_set_header: PartSetHeader {
                total: 1,
                hash: Hash(sha256_hash(b"parts")),
            },
        };
        let sign_bytes = vote_sign_bytes(chain_id, height, 0, Some(&block_id));

        let signatures = vals
            .validators()
            .iter()
            .map(|validator| {
                let signer = self.0[first..last]
                    .iter()
                    .find(|key| key.pub_key().address() == validator.address);
                match signer {
                    Some(key) => CommitSig::ForBlock {
                        validator_address: validator.address,
                        signature: key.sign(&sign_bytes),
                    },
                    None => CommitSig::Absent,
                }
            })
            .collect();

        SignedHeader {
            header,
            commit: Commit {
                height,
                round: 0,
                block_id,
                signatures,
            },
        }
    }
}
