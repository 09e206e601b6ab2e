use crate::types::block::BlockId;
use crate::types::validator::{PublicKey, Signature};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Domain separation tag for BLS12-381 vote signatures (proof-of-possession scheme).
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Prefix mixed into every vote sign-bytes so a vote can never be replayed as another message type.
const VOTE_SIGN_BYTES_PREFIX: &[u8] = b"halyard/vote/v1";

const LEAF_PREFIX: u8 = 0x00;
const INNER_PREFIX: u8 = 0x01;

/// Why a single signature failed to verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Malformed public key: {reason}")]
    MalformedPublicKey { reason: String },

    #[error("Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    #[error("Signature does not verify against the public key")]
    Invalid,
}

/// The bytes a validator signs when voting in a commit.
///
/// `block_id` is `None` for a nil vote. Chain id is length-prefixed so that
/// no two `(chain_id, height)` pairs can produce the same encoding.
pub fn vote_sign_bytes(chain_id: &str, height: u64, round: u32, block_id: Option<&BlockId>) -> Vec<u8> {
    let mut out = Vec::with_capacity(VOTE_SIGN_BYTES_PREFIX.len() + chain_id.len() + 96);
    out.extend_from_slice(VOTE_SIGN_BYTES_PREFIX);
    out.extend_from_slice(&(chain_id.len() as u32).to_be_bytes());
    out.extend_from_slice(chain_id.as_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&round.to_be_bytes());
    match block_id {
        Some(id) => {
            out.push(1);
            out.extend_from_slice(&id.encode());
        }
        None => out.push(0),
    }
    out
}

/// Verify one validator signature over `message`.
pub fn verify_signature(
    pub_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), SignatureError> {
    match pub_key {
        PublicKey::Ed25519(key) => verify_ed25519(&key.0, message, signature.as_bytes()),
        PublicKey::Bls12381(key) => verify_bls(&key.0, message, signature.as_bytes()),
    }
}

fn verify_ed25519(key: &[u8; 32], message: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
    use ed25519_dalek::{Signature as EdSignature, VerifyingKey};

    let key = VerifyingKey::from_bytes(key).map_err(|e| SignatureError::MalformedPublicKey {
        reason: e.to_string(),
    })?;
    let sig = EdSignature::from_slice(signature).map_err(|e| SignatureError::MalformedSignature {
        reason: e.to_string(),
    })?;

    key.verify_strict(message, &sig)
        .map_err(|_| SignatureError::Invalid)
}

/// Verify a single (non-aggregated) BLS12-381 signature with the blst library.
fn verify_bls(key: &[u8; 48], message: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
    use blst::min_pk::{PublicKey as BlsKey, Signature as BlsSig};
    use blst::BLST_ERROR;

    let pk = BlsKey::from_bytes(key).map_err(|e| SignatureError::MalformedPublicKey {
        reason: format!("{:?}", e),
    })?;
    let sig = BlsSig::from_bytes(signature).map_err(|e| SignatureError::MalformedSignature {
        reason: format!("{:?}", e),
    })?;

    let result = sig.verify(true, message, BLS_DST, &[], &pk, true);
    if result != BLST_ERROR::BLST_SUCCESS {
        return Err(SignatureError::Invalid);
    }

    Ok(())
}

/// Merkle root over a list of byte strings (RFC 6962 tree shape).
///
/// Leaves and inner nodes are domain separated, and the empty tree hashes to
/// SHA256 of the empty string.
pub fn merkle_root<T: AsRef<[u8]>>(items: &[T]) -> [u8; 32] {
    match items.len() {
        0 => sha256_hash(&[]),
        1 => leaf_hash(items[0].as_ref()),
        n => {
            let k = split_point(n);
            let left = merkle_root(&items[..k]);
            let right = merkle_root(&items[k..]);
            inner_hash(&left, &right)
        }
    }
}

/// Largest power of two strictly less than `n` (n >= 2).
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}

fn leaf_hash(leaf: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf);
    finalize(hasher)
}

fn inner_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    finalize(hasher)
}

/// SHA256 hash of arbitrary data.
pub fn sha256_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    finalize(hasher)
}

fn finalize(hasher: Sha256) -> [u8; 32] {
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
